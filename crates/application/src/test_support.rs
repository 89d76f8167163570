use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use rbac_seed_core::{AppError, AppResult};

use crate::{Clock, CompiledSeed, IdGenerator, SeedArtifacts, SeedWriter};

pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl FixedClock {
    pub(crate) fn at_epoch_offset(seconds: i64) -> Self {
        Self(
            Utc.timestamp_opt(1_735_689_600 + seconds, 0)
                .single()
                .unwrap_or_else(|| unreachable!()),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Hands out `00000000-0000-0000-0000-00000000000N` style identifiers.
#[derive(Default)]
pub(crate) struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub(crate) fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    pub(crate) fn issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn new_id(&self) -> Uuid {
        let value = self.next.fetch_add(1, Ordering::SeqCst);
        Uuid::from_u128(u128::from(value) + 1)
    }
}

pub(crate) struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[derive(Default)]
pub(crate) struct RecordingSeedWriter {
    pub(crate) written: Mutex<Vec<CompiledSeed>>,
    pub(crate) fail_with: Option<String>,
}

impl RecordingSeedWriter {
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            written: Mutex::new(Vec::new()),
            fail_with: Some(message.to_owned()),
        }
    }

    pub(crate) fn write_count(&self) -> usize {
        self.written
            .lock()
            .map(|written| written.len())
            .unwrap_or_default()
    }
}

impl SeedWriter for RecordingSeedWriter {
    fn write(&self, seed: &CompiledSeed) -> AppResult<SeedArtifacts> {
        if let Some(message) = &self.fail_with {
            return Err(AppError::Output(message.clone()));
        }

        self.written
            .lock()
            .map_err(|error| AppError::Internal(format!("writer lock poisoned: {error}")))?
            .push(seed.clone());

        Ok(SeedArtifacts {
            role_location: "memory://roles".to_owned(),
            grant_location: "memory://grants".to_owned(),
        })
    }
}
