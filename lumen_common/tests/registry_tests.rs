//! Error registry behaviour tests.
//!
//! Covers id uniqueness, queue ordering, fan-out completeness and order,
//! unregistered-domain handling and the config/lua startup scenario.

use lumen_common::error::{DomainId, ErrorLevel, ErrorRegistry, Message};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

// ─── Helpers ────────────────────────────────────────────────────────

/// Owned copy of one callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seen {
    domain: DomainId,
    level: ErrorLevel,
    text: String,
}

/// Subscribe a recorder and return its log.
fn record(registry: &ErrorRegistry) -> Arc<Mutex<Vec<Seen>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    registry.add_callback(move |event| {
        sink.lock().push(Seen {
            domain: event.domain,
            level: event.level,
            text: event.message.to_string(),
        });
    });
    log
}

// ─── Registration ───────────────────────────────────────────────────

#[test]
fn test_ids_unique_even_for_repeated_names() {
    let registry = ErrorRegistry::new();
    let mut seen = HashSet::new();
    for round in 0..50 {
        let name = if round % 2 == 0 { "lua" } else { "module" };
        assert!(seen.insert(registry.register(name)), "id reused in round {round}");
    }
    assert_eq!(registry.domains().len(), 50);
}

#[test]
fn test_domains_listed_in_registration_order() {
    let registry = ErrorRegistry::new();
    registry.register("config");
    registry.register("lua");
    registry.register("module");

    let names: Vec<String> = registry.domains().into_iter().map(|(_, name)| name).collect();
    assert_eq!(names, vec!["config", "lua", "module"]);
}

// ─── Queues ─────────────────────────────────────────────────────────

#[test]
fn test_queue_preserves_report_order() {
    let registry = ErrorRegistry::new();
    let id = registry.register("lua");
    let other = registry.register("config");

    let reports = [
        (ErrorLevel::Warning, "first"),
        (ErrorLevel::Fatal, "second"),
        (ErrorLevel::Critical, "third"),
        (ErrorLevel::Warning, "fourth"),
    ];
    for (level, text) in reports {
        registry.report(id, level, text);
    }
    registry.report(other, ErrorLevel::Fatal, "elsewhere");

    let expected: Vec<Message> = reports
        .iter()
        .map(|(level, text)| Message::new(*level, *text))
        .collect();
    assert_eq!(registry.messages(id), Some(expected));
    assert_eq!(registry.messages(other).map(|q| q.len()), Some(1));
}

// ─── Fan-out ────────────────────────────────────────────────────────

#[test]
fn test_every_subscriber_sees_every_report() {
    let registry = ErrorRegistry::new();
    let id = registry.register("lua");
    let logs: Vec<_> = (0..3).map(|_| record(&registry)).collect();

    for n in 0..5 {
        registry.report(id, ErrorLevel::Critical, format!("report {n}"));
    }

    for log in &logs {
        let log = log.lock();
        assert_eq!(log.len(), 5);
        for (n, seen) in log.iter().enumerate() {
            assert_eq!(seen.domain, id);
            assert_eq!(seen.level, ErrorLevel::Critical);
            assert_eq!(seen.text, format!("report {n}"));
        }
    }
}

#[test]
fn test_subscribers_run_in_registration_order() {
    let registry = ErrorRegistry::new();
    let id = registry.register("lua");
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["a", "b", "c"] {
        let order = Arc::clone(&order);
        registry.add_callback(move |_| order.lock().push(name));
    }

    registry.report(id, ErrorLevel::Warning, "one");
    registry.report(id, ErrorLevel::Fatal, "two");

    assert_eq!(*order.lock(), vec!["a", "b", "c", "a", "b", "c"]);
}

#[test]
fn test_subscriber_added_during_fan_out_sees_only_later_reports() {
    let registry = Arc::new(ErrorRegistry::new());
    let id = registry.register("lua");
    let late_hits = Arc::new(Mutex::new(0usize));

    let inner = Arc::clone(&registry);
    let hits = Arc::clone(&late_hits);
    let installed = Arc::new(Mutex::new(false));
    registry.add_callback(move |_| {
        let mut installed = installed.lock();
        if !*installed {
            *installed = true;
            let hits = Arc::clone(&hits);
            inner.add_callback(move |_| *hits.lock() += 1);
        }
    });

    registry.report(id, ErrorLevel::Warning, "first");
    assert_eq!(*late_hits.lock(), 0);
    registry.report(id, ErrorLevel::Warning, "second");
    assert_eq!(*late_hits.lock(), 1);
}

// ─── Unregistered domains ───────────────────────────────────────────

#[test]
fn test_report_to_unregistered_domain_is_ignored() {
    let registry = ErrorRegistry::new();
    let known = registry.register("lua");
    let log = record(&registry);

    registry.report(DomainId::from_raw(7), ErrorLevel::Fatal, "lost");

    assert!(log.lock().is_empty());
    assert_eq!(registry.messages(DomainId::from_raw(7)), None);
    assert_eq!(registry.messages(known), Some(Vec::new()));
}

// ─── Scenario ───────────────────────────────────────────────────────

#[test]
fn test_config_then_lua_scenario() {
    let registry = ErrorRegistry::new();
    let log = record(&registry);

    let config = registry.register("config");
    let lua = registry.register("lua");
    assert_eq!(config.raw(), 0);
    assert_eq!(lua.raw(), 1);

    registry.report(lua, ErrorLevel::Fatal, "boom");

    assert_eq!(
        registry.messages(lua),
        Some(vec![Message::new(ErrorLevel::Fatal, "boom")])
    );
    assert_eq!(registry.messages(config), Some(Vec::new()));
    assert_eq!(
        *log.lock(),
        vec![Seen {
            domain: lua,
            level: ErrorLevel::Fatal,
            text: "boom".to_string(),
        }]
    );
}
