#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use price_dashboard_wasm::application::Timer;
use price_dashboard_wasm::domain::errors::FetchError;
use price_dashboard_wasm::domain::history::Clock;
use price_dashboard_wasm::domain::market_data::{PriceSource, Symbol};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// What the scripted source does for one request
pub enum Step {
    Respond(Result<String, FetchError>),
    /// Never completes; only the timeout ends it
    Hang,
    /// Completes when the test sends on the paired channel
    Wait(oneshot::Receiver<Result<String, FetchError>>),
}

/// Price source replaying per-symbol scripts; unscripted requests hang.
#[derive(Default)]
pub struct ScriptedSource {
    steps: RefCell<HashMap<String, VecDeque<Step>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, symbol: &str, step: Step) -> &Self {
        self.steps.borrow_mut().entry(symbol.to_string()).or_default().push_back(step);
        self
    }

    pub fn respond(&self, symbol: &str, price: &str) -> &Self {
        self.push(symbol, Step::Respond(Ok(price.to_string())))
    }

    pub fn fail(&self, symbol: &str, error: FetchError) -> &Self {
        self.push(symbol, Step::Respond(Err(error)))
    }

    /// Returns the sender that releases the response
    pub fn gate(&self, symbol: &str) -> oneshot::Sender<Result<String, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.push(symbol, Step::Wait(rx));
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PriceSource for ScriptedSource {
    fn fetch_price<'a>(&'a self, symbol: &'a Symbol) -> LocalBoxFuture<'a, Result<String, FetchError>> {
        self.calls.borrow_mut().push(symbol.to_string());
        let step = self.steps.borrow_mut().get_mut(symbol.value()).and_then(VecDeque::pop_front);
        match step.unwrap_or(Step::Hang) {
            Step::Respond(result) => future::ready(result).boxed_local(),
            Step::Hang => future::pending().boxed_local(),
            Step::Wait(rx) => rx
                .map(|r| r.unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".into()))))
                .boxed_local(),
        }
    }
}

/// Every sleep is already over, so a fetch that is not ready on first poll
/// times out.
pub struct ImmediateTimer;

impl Timer for ImmediateTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}

/// Sleeps never finish; requests can only complete on their own.
pub struct NeverTimer;

impl Timer for NeverTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        future::pending().boxed_local()
    }
}

/// Clock advanced by hand
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn symbols(names: &[&str]) -> Vec<Symbol> {
    names.iter().map(|s| Symbol::from(*s)).collect()
}
