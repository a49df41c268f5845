mod support;

use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;
use price_dashboard_wasm::application::{CycleReport, RefreshOrchestrator, RefreshState, TickScheduler};
use price_dashboard_wasm::domain::errors::FetchError;
use price_dashboard_wasm::domain::history::HistoryStore;
use price_dashboard_wasm::domain::market_data::Symbol;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use support::{ImmediateTimer, NeverTimer, ScriptedSource, symbols};

const SECOND: Duration = Duration::from_secs(1);

fn prices(store: &HistoryStore, symbol: &str) -> Vec<f64> {
    store
        .series(&Symbol::from(symbol))
        .map(|s| s.history().iter().map(|p| p.price).collect())
        .unwrap_or_default()
}

#[test]
fn slow_symbol_times_out_without_blocking_others() {
    let source = Rc::new(ScriptedSource::new());
    source.respond("AAA", "100.0");
    let store = HistoryStore::new(&symbols(&["AAA", "BBB"]), 3);
    let orchestrator = RefreshOrchestrator::new(source.clone(), Rc::new(ImmediateTimer), store.clone(), SECOND, SECOND);

    let report = block_on(orchestrator.run_cycle()).expect("cycle should run");

    assert_eq!((report.succeeded, report.failed), (1, 1));
    assert_eq!(prices(&store, "AAA"), vec![100.0]);
    assert!(prices(&store, "BBB").is_empty());
    let bbb = store.series(&Symbol::from("BBB")).unwrap();
    assert!(matches!(bbb.last_error(), Some(FetchError::Transport(msg)) if msg.contains("timed out")));
    assert_eq!(bbb.display_text(), "BBB: Error");
    assert_eq!(orchestrator.state(), RefreshState::Idle);
}

#[test]
fn every_symbol_is_fetched_once_per_cycle() {
    let source = Rc::new(ScriptedSource::new());
    source.respond("AAA", "1").respond("BBB", "2").respond("CCC", "3");
    let store = HistoryStore::new(&symbols(&["AAA", "BBB", "CCC"]), 3);
    let orchestrator = RefreshOrchestrator::new(source.clone(), Rc::new(ImmediateTimer), store, SECOND, SECOND);

    block_on(orchestrator.run_cycle());

    let mut calls = source.calls();
    calls.sort();
    assert_eq!(calls, vec!["AAA", "BBB", "CCC"]);
}

#[test]
fn commits_are_visible_before_the_cycle_ends() {
    let source = Rc::new(ScriptedSource::new());
    let gate_a = source.gate("AAA");
    let gate_b = source.gate("BBB");
    let store = HistoryStore::new(&symbols(&["AAA", "BBB"]), 3);
    let orchestrator =
        Rc::new(RefreshOrchestrator::new(source.clone(), Rc::new(NeverTimer), store.clone(), SECOND, SECOND));

    let mut pool = LocalPool::new();
    let report: Rc<RefCell<Option<CycleReport>>> = Rc::new(RefCell::new(None));
    {
        let orchestrator = orchestrator.clone();
        let report = report.clone();
        pool.spawner()
            .spawn_local(async move {
                *report.borrow_mut() = orchestrator.run_cycle().await;
            })
            .unwrap();
    }

    pool.run_until_stalled();
    assert_eq!(orchestrator.state(), RefreshState::Refreshing);

    gate_a.send(Ok("1.5".into())).unwrap();
    pool.run_until_stalled();

    // Mixed view: AAA is on the new tick, BBB still on the old one.
    assert_eq!(prices(&store, "AAA"), vec![1.5]);
    assert!(store.series(&Symbol::from("BBB")).unwrap().is_loading());
    assert!(report.borrow().is_none());
    assert_eq!(orchestrator.state(), RefreshState::Refreshing);

    // At most one cycle in flight.
    assert!(block_on(orchestrator.run_cycle()).is_none());

    gate_b.send(Ok("2.5".into())).unwrap();
    pool.run_until_stalled();

    let report = report.borrow().expect("cycle finished");
    assert_eq!((report.succeeded, report.failed), (2, 0));
    assert_eq!(orchestrator.state(), RefreshState::Idle);
}

#[test]
fn commit_order_follows_completion_order() {
    let source = Rc::new(ScriptedSource::new());
    let gate_a = source.gate("AAA");
    let gate_b = source.gate("BBB");
    let order: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let store = HistoryStore::new(&symbols(&["AAA", "BBB"]), 3);
    let orchestrator = {
        let order = order.clone();
        Rc::new(
            RefreshOrchestrator::new(source.clone(), Rc::new(NeverTimer), store, SECOND, SECOND)
                .with_commit_listener(move |symbol, _| order.borrow_mut().push(symbol.to_string())),
        )
    };

    let mut pool = LocalPool::new();
    {
        let orchestrator = orchestrator.clone();
        pool.spawner()
            .spawn_local(async move {
                orchestrator.run_cycle().await;
            })
            .unwrap();
    }
    pool.run_until_stalled();
    gate_b.send(Err(FetchError::Decode("eof".into()))).unwrap();
    pool.run_until_stalled();
    gate_a.send(Ok("7".into())).unwrap();
    pool.run_until_stalled();

    assert_eq!(*order.borrow(), vec!["BBB", "AAA"]);
}

#[test]
fn cycle_listener_receives_report() {
    let source = Rc::new(ScriptedSource::new());
    source.respond("AAA", "1");
    let seen: Rc<RefCell<Vec<CycleReport>>> = Rc::new(RefCell::new(Vec::new()));
    let orchestrator = {
        let seen = seen.clone();
        RefreshOrchestrator::new(
            source.clone(),
            Rc::new(ImmediateTimer),
            HistoryStore::new(&symbols(&["AAA"]), 3),
            SECOND,
            SECOND,
        )
        .with_cycle_listener(move |report| seen.borrow_mut().push(*report))
    };

    block_on(orchestrator.run_cycle());

    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].status_line().split(" in ").next(), Some("updated 1/1 symbols"));
}

#[test]
fn run_forever_starts_with_an_immediate_cycle() {
    let source = Rc::new(ScriptedSource::new());
    source.respond("AAA", "42");
    let store = HistoryStore::new(&symbols(&["AAA"]), 3);
    let orchestrator =
        Rc::new(RefreshOrchestrator::new(source.clone(), Rc::new(NeverTimer), store.clone(), SECOND, SECOND));

    let mut pool = LocalPool::new();
    {
        let orchestrator = orchestrator.clone();
        pool.spawner()
            .spawn_local(async move { orchestrator.run_forever().await })
            .unwrap();
    }
    pool.run_until_stalled();

    assert_eq!(prices(&store, "AAA"), vec![42.0]);
    assert_eq!(orchestrator.state(), RefreshState::Idle);
    orchestrator.stop();
}

#[test]
fn scheduler_waits_out_the_rest_of_the_interval() {
    let scheduler = TickScheduler::new(SECOND);
    let decision = scheduler.next_tick(Duration::from_millis(300));
    assert_eq!(decision.delay, Duration::from_millis(700));
    assert_eq!(decision.skipped, 0);
}

#[test]
fn scheduler_skips_forward_after_overrun() {
    let scheduler = TickScheduler::new(SECOND);

    let decision = scheduler.next_tick(Duration::from_millis(2500));
    assert_eq!(decision.delay, Duration::from_millis(500));
    assert_eq!(decision.skipped, 2);

    let decision = scheduler.next_tick(SECOND);
    assert_eq!(decision.delay, Duration::ZERO);
    assert_eq!(decision.skipped, 0);
}

#[test]
fn zero_interval_never_sleeps() {
    let decision = TickScheduler::new(Duration::ZERO).next_tick(Duration::from_millis(5));
    assert_eq!(decision.delay, Duration::ZERO);
}
