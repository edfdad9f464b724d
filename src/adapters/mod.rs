// Adapters layer: concrete implementations for external systems (files, remote catalog).

pub mod record_store;
pub mod storage;
pub mod sync;

#[cfg(feature = "remote-sync")]
pub mod http_sync;
