//! Watcher Use Case - Periodic Batched Reads
//!
//! Turns the `[watch]` config section into a fixed list of labelled
//! descriptors (native balances plus arbitrary view calls) and reads
//! all of them through one multicall batch per poll.

use std::sync::Arc;
use std::time::Duration;

use alloy::dyn_abi::DynSolValue;
use alloy::hex;
use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use crate::config::WatchConfig;
use crate::domain::call::CallDescriptor;
use crate::ports::node_client::{CallOverrides, NodeClient};

use super::multicall_provider::MulticallProvider;

/// One decoded value from a poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
  pub label: String,
  pub value: DynSolValue,
}

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
  pub block_number: u64,
  pub readings: Vec<Reading>,
}

/// Polls a fixed set of calls through a multicall provider.
pub struct Watcher<N: NodeClient> {
  provider: Arc<MulticallProvider<N>>,
  labels: Vec<String>,
  calls: Vec<CallDescriptor>,
  overrides: CallOverrides,
  interval: Duration,
}

impl<N: NodeClient> Watcher<N> {
  /// Build the call list from config.
  ///
  /// The provider must already be resolved.
  pub fn from_config(provider: Arc<MulticallProvider<N>>, watch: &WatchConfig) -> Result<Self> {
    let mut labels = Vec::with_capacity(watch.accounts.len() + watch.calls.len());
    let mut calls = Vec::with_capacity(labels.capacity());

    for account in &watch.accounts {
      calls.push(
        provider
          .eth_balance(*account)
          .context("Multicall provider is not ready")?,
      );
      labels.push(format!("balance:{account}"));
    }

    for call in &watch.calls {
      calls.push(
        CallDescriptor::from_strings(call.target, &call.signature, &call.args)
          .with_context(|| format!("Invalid call `{}`", call.label))?,
      );
      labels.push(call.label.clone());
    }

    Ok(Self {
      provider,
      labels,
      calls,
      overrides: CallOverrides {
        block: Some(watch.block_id()?),
        ..CallOverrides::default()
      },
      interval: Duration::from_secs(watch.poll_interval_seconds),
    })
  }

  pub fn len(&self) -> usize {
    self.calls.len()
  }

  pub fn is_empty(&self) -> bool {
    self.calls.is_empty()
  }

  /// Read every watched value in one batch.
  #[instrument(skip(self), fields(calls = self.calls.len()))]
  pub async fn poll_once(&self) -> Result<PollReport> {
    let outcome = self
      .provider
      .all_with_block(&self.calls, &self.overrides)
      .await
      .context("Multicall batch failed")?;

    let readings = self
      .labels
      .iter()
      .zip(outcome.values)
      .map(|(label, value)| Reading {
        label: label.clone(),
        value,
      })
      .collect();

    Ok(PollReport {
      block_number: outcome.block_number,
      readings,
    })
  }

  /// Poll until shutdown. With a zero interval, polls once and returns.
  #[instrument(skip(self, shutdown_rx))]
  pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
    loop {
      match self.poll_once().await {
        Ok(report) => log_report(&report),
        Err(e) => warn!(error = %format!("{e:#}"), "Poll failed"),
      }

      if self.interval.is_zero() {
        return Ok(());
      }

      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!("Watcher received shutdown signal");
          return Ok(());
        }
        () = tokio::time::sleep(self.interval) => {}
      }
    }
  }
}

fn log_report(report: &PollReport) {
  for reading in &report.readings {
    info!(
      block = report.block_number,
      label = %reading.label,
      value = %format_value(&reading.value),
      "Reading"
    );
  }
}

/// Human-readable rendering of a decoded value.
pub fn format_value(value: &DynSolValue) -> String {
  match value {
    DynSolValue::Bool(b) => b.to_string(),
    DynSolValue::Int(i, _) => i.to_string(),
    DynSolValue::Uint(u, _) => u.to_string(),
    DynSolValue::Address(a) => a.to_string(),
    DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
    DynSolValue::Bytes(bytes) => hex::encode_prefixed(bytes),
    DynSolValue::String(s) => s.clone(),
    DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
      format!("[{}]", join_values(items))
    }
    DynSolValue::Tuple(items) => format!("({})", join_values(items)),
    other => format!("{other:?}"),
  }
}

fn join_values(items: &[DynSolValue]) -> String {
  items.iter().map(format_value).collect::<Vec<_>>().join(", ")
}
