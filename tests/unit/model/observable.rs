use super::*;

fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn notify_without_subscribers_is_a_no_op() {
    let m = Model::new(1.0_f64);
    m.notify().unwrap();
    m.set(2.0, Propagate::Notify).unwrap();
    assert_eq!(m.get(), 2.0);
}

#[test]
fn subscribers_run_once_in_registration_order() {
    let m = Model::new(0_i32);
    let log = recorder();
    for name in ["first", "second", "third"] {
        let log = Rc::clone(&log);
        m.subscribe(move || {
            log.borrow_mut().push(name);
            Ok(())
        });
    }

    m.set(5, Propagate::Defer).unwrap();
    assert!(log.borrow().is_empty());
    m.notify().unwrap();
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn failing_subscriber_stops_the_pass() {
    let m = Model::new(0_i32);
    let log = recorder();
    {
        let log = Rc::clone(&log);
        m.subscribe(move || {
            log.borrow_mut().push("before");
            Ok(())
        });
    }
    m.subscribe(|| Err(GeomotionError::arithmetic("boom")));
    {
        let log = Rc::clone(&log);
        m.subscribe(move || {
            log.borrow_mut().push("after");
            Ok(())
        });
    }

    let err = m.set(1, Propagate::Notify).unwrap_err();
    assert!(matches!(err, GeomotionError::Arithmetic(_)));
    assert_eq!(*log.borrow(), vec!["before"]);
}

#[test]
fn unsubscribe_removes_only_that_callback() {
    let m = Model::new(0_i32);
    let hits = Rc::new(Cell::new(0));
    let a = {
        let hits = Rc::clone(&hits);
        m.subscribe(move || {
            hits.set(hits.get() + 1);
            Ok(())
        })
    };
    {
        let hits = Rc::clone(&hits);
        m.subscribe(move || {
            hits.set(hits.get() + 10);
            Ok(())
        });
    }
    assert!(m.unsubscribe(a));
    assert!(!m.unsubscribe(a));
    m.notify().unwrap();
    assert_eq!(hits.get(), 10);
    assert_eq!(m.node().subscriber_count(), 1);
}

#[test]
fn nested_notification_completes_before_outer_continues() {
    let outer = Model::new(0_i32);
    let inner = Model::new(0_i32);
    let log = recorder();
    {
        let log = Rc::clone(&log);
        inner.subscribe(move || {
            log.borrow_mut().push("inner");
            Ok(())
        });
    }
    {
        let inner = inner.clone();
        let log = Rc::clone(&log);
        outer.subscribe(move || {
            log.borrow_mut().push("outer:start");
            inner.set(1, Propagate::Notify)?;
            log.borrow_mut().push("outer:end");
            Ok(())
        });
    }
    {
        let log = Rc::clone(&log);
        outer.subscribe(move || {
            log.borrow_mut().push("outer:second");
            Ok(())
        });
    }

    outer.notify().unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["outer:start", "inner", "outer:end", "outer:second"]
    );
}

#[test]
fn clones_share_identity_and_state() {
    let a = Model::new(vec![1, 2]);
    let b = a.clone();
    b.update(|v| v.push(3), Propagate::Notify).unwrap();
    assert!(a.ptr_eq(&b));
    assert_eq!(a.id(), b.id());
    assert_eq!(a.get(), vec![1, 2, 3]);
    assert_ne!(a.id(), Model::new(vec![1, 2, 3]).id());
}

#[test]
fn try_update_leaves_state_on_error() {
    let m = Model::new(3_i32);
    let err = m
        .try_update(
            |v| {
                *v = 99;
                Err(GeomotionError::count_mismatch("nope"))
            },
            Propagate::Notify,
        )
        .unwrap_err();
    assert!(matches!(err, GeomotionError::CountMismatch(_)));
    assert_eq!(m.get(), 3);
}

#[test]
fn dependency_edges_reject_cycles() {
    let a = Observable::new();
    let b = Observable::new();
    let c = Observable::new();
    a.link_dependent(&b).unwrap();
    b.link_dependent(&c).unwrap();
    assert!(a.reaches(c.id()));

    let err = c.link_dependent(&a).unwrap_err();
    assert!(matches!(err, GeomotionError::Cycle(_)));
    assert!(a.link_dependent(&a).is_err());
    // Re-declaring an existing edge is harmless.
    a.link_dependent(&b).unwrap();
}

#[test]
fn weak_model_reports_dropped_source() {
    let m = Model::new(1.5_f64);
    let weak = m.downgrade();
    assert_eq!(weak.get().unwrap(), 1.5);
    drop(m);
    assert!(matches!(
        weak.get().unwrap_err(),
        GeomotionError::LookupMiss(_)
    ));
}
