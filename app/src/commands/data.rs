//! FILENAME: app/src/commands/data.rs
// PURPOSE: Loading and replacing the record snapshot, refresh timing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use engine::{canonicalize, RawRecord, Record};

use crate::api_types::{LoadResponse, StatusResponse};
use crate::{lock, log_enter, log_error, log_exit, log_info, log_warn, AppState, Dataset};

/// Reloads the configured workbook and swaps in the new snapshot.
/// On failure the previous snapshot stays in place and the error is recorded.
pub fn load_data(state: &AppState) -> Result<LoadResponse, String> {
    log_enter!("DATA", "load_data", "{:?}", state.config.source_path);

    let path = state.config.source_path.clone();
    let loaded = persistence::load_records(
        &path,
        state.config.sheet_name.as_deref(),
        &state.config.column_keys,
    );

    match loaded {
        Ok(records) => {
            let response = replace_records(state, records, Some(path))?;
            log_exit!("DATA", "load_data", "{} records", response.record_count);
            Ok(response)
        }
        Err(e) => {
            let message = format!("Failed to load {:?}: {}", path, e);
            log_error!("DATA", "{}", message);
            *lock(&state.last_error)? = Some(message.clone());
            *lock(&state.last_refresh)? = Some(Instant::now());
            Err(message)
        }
    }
}

/// Installs an already-normalized snapshot.
/// Retained filter values that no longer exist are reset to "All"; the drill
/// selection is kept and re-resolved against the new snapshot.
pub fn replace_records(
    state: &AppState,
    records: Vec<Record>,
    source: Option<PathBuf>,
) -> Result<LoadResponse, String> {
    let dataset = Arc::new(Dataset::new(records, source));

    let filters_reset = lock(&state.filters)?.retain_available(&dataset.options);
    if filters_reset {
        log_warn!("DATA", "Reset filter values missing from the new snapshot");
    }

    *lock(&state.dataset)? = Arc::clone(&dataset);
    *lock(&state.last_error)? = None;
    *lock(&state.last_refresh)? = Some(Instant::now());

    log_info!(
        "DATA",
        "Loaded {} records from {:?}",
        dataset.records.len(),
        dataset.source
    );

    Ok(LoadResponse {
        record_count: dataset.records.len(),
        source: dataset.source.as_ref().map(|p| p.display().to_string()),
        loaded_at: dataset.loaded_at_display().unwrap_or_default(),
        options: dataset.options.clone(),
        filters_reset,
    })
}

/// Normalizes raw rows with the configured column keys, then installs them.
pub fn replace_raw_records(
    state: &AppState,
    rows: &[RawRecord],
    source: Option<PathBuf>,
) -> Result<LoadResponse, String> {
    let records = canonicalize(rows, &state.config.column_keys);
    replace_records(state, records, source)
}

/// Whole seconds until the next scheduled reload; 0 when one is due.
pub fn seconds_until_refresh(state: &AppState) -> Result<u64, String> {
    let last = *lock(&state.last_refresh)?;
    Ok(match last {
        Some(at) => remaining_secs(state.config.refresh_interval(), at.elapsed()),
        None => 0,
    })
}

pub fn refresh_due(state: &AppState) -> Result<bool, String> {
    Ok(seconds_until_refresh(state)? == 0)
}

fn remaining_secs(interval: Duration, elapsed: Duration) -> u64 {
    let remaining = interval.saturating_sub(elapsed);
    if remaining.subsec_nanos() > 0 {
        remaining.as_secs() + 1
    } else {
        remaining.as_secs()
    }
}

pub fn get_status(state: &AppState) -> Result<StatusResponse, String> {
    let snapshot = state.snapshot()?;
    Ok(StatusResponse {
        connected: state.is_connected()?,
        record_count: snapshot.records.len(),
        last_refresh: snapshot.loaded_at_display(),
        seconds_until_refresh: seconds_until_refresh(state)?,
        last_error: lock(&state.last_error)?.clone(),
    })
}
