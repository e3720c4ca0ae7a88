//! Device data-source interfaces.
//!
//! Everything transport-related lives behind these traits: session
//! setup, authentication, reachability probing, and timeouts belong to
//! the implementor. The monitoring core only asks an open source for
//! one routing-table observation and guarantees the handle is released
//! exactly once afterwards.

use crate::config::DeviceConfig;
use crate::error::{ConnectError, FetchError};
use crate::table::RouteTable;

/// An open session to one device, able to produce routing-table
/// observations.
pub trait DeviceSource {
    /// Fetches the current routing table.
    ///
    /// Callers wanting a timeout apply it around this call; the core
    /// does not impose one.
    fn fetch_table(&mut self) -> Result<RouteTable, FetchError>;

    /// Releases the underlying session.
    ///
    /// Called exactly once per handle, on every exit path. The default
    /// is a no-op for sources with nothing to tear down.
    fn close(&mut self) {}
}

/// Opens device sessions on behalf of the batch runner.
pub trait DeviceConnector {
    /// Cheap reachability probe, run before attempting a session.
    ///
    /// An unreachable device becomes a per-device error result without
    /// a connection attempt.
    fn probe(&self, device: &DeviceConfig) -> bool;

    /// Opens a session to `device`.
    fn connect(&self, device: &DeviceConfig) -> Result<Box<dyn DeviceSource>, ConnectError>;
}

/// Owns a [`DeviceSource`] for the duration of one check and closes it
/// on drop.
///
/// Scoped acquisition makes release-on-every-path structural: early
/// returns and unwinds all run `close`, and the `closed` flag keeps a
/// manual close followed by drop from running it twice.
pub struct SourceGuard<S: DeviceSource + ?Sized> {
    closed: bool,
    source: Box<S>,
}

impl<S: DeviceSource + ?Sized> SourceGuard<S> {
    /// Takes ownership of an open source.
    pub fn new(source: Box<S>) -> Self {
        Self {
            closed: false,
            source,
        }
    }

    /// Fetches the current table from the guarded source.
    pub fn fetch_table(&mut self) -> Result<RouteTable, FetchError> {
        self.source.fetch_table()
    }

    /// Closes the source now instead of at drop.
    pub fn close(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if !self.closed {
            self.closed = true;
            self.source.close();
        }
    }
}

impl<S: DeviceSource + ?Sized> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        self.close_once();
    }
}
