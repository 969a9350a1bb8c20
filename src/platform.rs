use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Network reachability probe, queried at enqueue and again right
/// before a flush actually runs.
pub trait Connectivity {
    fn is_connected(&self) -> bool;
}

/// Who is signed in right now, if anyone. Sync is a no-op without one.
pub trait Identity {
    fn current_user_id(&self) -> Option<String>;
}

/// Wall-clock milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

pub struct StubConnectivity {
    connected: Cell<bool>,
}

impl StubConnectivity {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: Cell::new(connected),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.set(connected);
    }
}

impl Connectivity for StubConnectivity {
    fn is_connected(&self) -> bool {
        self.connected.get()
    }
}

#[derive(Default)]
pub struct StubIdentity {
    user_id: std::cell::RefCell<Option<String>>,
}

impl StubIdentity {
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            user_id: std::cell::RefCell::new(Some(user_id.to_string())),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn set_user(&self, user_id: Option<&str>) {
        *self.user_id.borrow_mut() = user_id.map(str::to_string);
    }
}

impl Identity for StubIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.borrow().clone()
    }
}

pub struct FixedClock {
    now: Cell<u64>,
}

impl FixedClock {
    pub fn new(now: u64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
