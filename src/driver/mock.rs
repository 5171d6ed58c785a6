//! In-memory driver used by the unit tests.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use thiserror::Error;

use super::{DriverClient, DriverDatabase};

#[derive(Debug, Error)]
#[error("mock driver failure: {0}")]
pub struct MockError(pub &'static str);

#[derive(Debug, Default)]
pub struct MockState {
    pub connect_calls: AtomicUsize,
    pub close_calls: AtomicUsize,
    pub fail_connect: AtomicBool,
    pub fail_close: AtomicBool,
    pub closed: AtomicBool,
}

/// Cloning shares the state, like clones of `MongoDriver` share one client.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    pub state: Arc<MockState>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_connect() -> Self {
        let client = Self::new();
        client.state.fail_connect.store(true, Ordering::SeqCst);
        client
    }

    pub fn set_fail_close(&self, fail: bool) {
        self.state.fail_close.store(fail, Ordering::SeqCst);
    }

    pub fn connect_calls(&self) -> usize {
        self.state.connect_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.state.close_calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

impl DriverClient for MockClient {
    type Database = MockDatabase;
    type Error = MockError;

    async fn connect(&self) -> Result<(), MockError> {
        self.state.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_connect.load(Ordering::SeqCst) {
            return Err(MockError("server unreachable"));
        }
        self.state.closed.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), MockError> {
        self.state.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_close.load(Ordering::SeqCst) {
            return Err(MockError("close failed"));
        }
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn database(&self, name: &str) -> MockDatabase {
        MockDatabase {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockDatabase {
    name: String,
}

impl DriverDatabase for MockDatabase {
    type Collection<T: Send + Sync> = MockCollection<T>;

    fn name(&self) -> &str {
        &self.name
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> MockCollection<T> {
        MockCollection {
            database: self.name.clone(),
            name: name.to_string(),
            _marker: PhantomData,
        }
    }
}

#[derive(Debug)]
pub struct MockCollection<T> {
    pub database: String,
    pub name: String,
    _marker: PhantomData<T>,
}
