use std::cell::Cell;
use std::rc::Rc;

use flow_core::{AnyComponent, ComponentHost, EnvironmentBuilder, Size, Transition};
use flow_testing::{
    init_logging, provide, CounterComponent, CounterState, RenderProbe, TestEnvironment,
};

const CONTAINER: Size = Size {
    width: 400.0,
    height: 300.0,
};

fn counter(start: i32, probe: &RenderProbe) -> AnyComponent<TestEnvironment> {
    AnyComponent::new(CounterComponent::new(start, probe))
}

#[test]
fn state_mutation_rerenders_in_place() {
    init_logging();
    let host = ComponentHost::new();
    let probe = RenderProbe::new();
    let environment_calls = Rc::new(Cell::new(0));

    let calls = environment_calls.clone();
    let size = host.update(
        Transition::immediate(),
        counter(3, &probe),
        move |builder: &mut EnvironmentBuilder<'_, TestEnvironment>| {
            calls.set(calls.get() + 1);
            builder.set(TestEnvironment::light());
        },
        CONTAINER,
    );
    assert_eq!(size.width, CounterComponent::width_for(3));
    let view = host.component_view().expect("component view");

    let state = probe.state().expect("rendered state");
    assert!(state.has_update_handler());
    state
        .mutate(Transition::immediate(), |counter: &mut CounterState| {
            counter.count += 2
        })
        .expect("counter state");

    assert_eq!(probe.updates(), 2);
    assert_eq!(probe.views_made(), 1);
    assert_eq!(environment_calls.get(), 1);
    assert!(host.component_view().expect("component view").ptr_eq(&view));
    assert_eq!(
        host.current_size(),
        Some(Size::new(CounterComponent::width_for(5), 20.0))
    );
    assert_eq!(view.frame().size().width, CounterComponent::width_for(5));
    assert_eq!(probe.last_available_size(), Some(CONTAINER));
    assert_eq!(probe.last_environment(), Some(TestEnvironment::light()));
}

#[test]
fn state_survives_external_rerenders() {
    let host = ComponentHost::new();
    let probe = RenderProbe::new();

    host.update(
        Transition::immediate(),
        counter(1, &probe),
        provide(TestEnvironment::light()),
        CONTAINER,
    );
    probe
        .state()
        .expect("rendered state")
        .mutate(Transition::immediate(), |counter: &mut CounterState| {
            counter.count = 7
        })
        .expect("counter state");

    // A different description re-renders but keeps the existing state.
    let size = host.update(
        Transition::immediate(),
        counter(2, &probe),
        provide(TestEnvironment::light()),
        CONTAINER,
    );

    assert_eq!(size.width, CounterComponent::width_for(7));
    assert_eq!(probe.updates(), 3);
}

#[test]
fn self_update_uses_committed_container_size() {
    let host = ComponentHost::new();
    let probe = RenderProbe::new();
    let narrow = Size::new(35.0, 300.0);

    host.update(
        Transition::immediate(),
        counter(1, &probe),
        provide(TestEnvironment::light()),
        narrow,
    );
    probe
        .state()
        .expect("rendered state")
        .mutate(Transition::immediate(), |counter: &mut CounterState| {
            counter.count = 9
        })
        .expect("counter state");

    assert_eq!(probe.last_available_size(), Some(narrow));
    assert_eq!(host.current_size(), Some(Size::new(35.0, 20.0)));
}

#[test]
fn request_during_update_is_deferred_until_pass_ends() {
    let host = ComponentHost::new();
    let probe = RenderProbe::new();
    probe.request_during_next_updates(1);

    let size = host.update(
        Transition::immediate(),
        counter(2, &probe),
        provide(TestEnvironment::light()),
        CONTAINER,
    );

    assert_eq!(probe.updates(), 2);
    assert!(!host.has_pending_update());
    assert!(!host.is_updating());
    assert_eq!(host.current_size(), Some(size));
}

#[test]
fn chained_requests_drain_in_order() {
    let host = ComponentHost::new();
    let probe = RenderProbe::new();
    probe.request_during_next_updates(4);

    host.update(
        Transition::immediate(),
        counter(2, &probe),
        provide(TestEnvironment::light()),
        CONTAINER,
    );

    assert_eq!(probe.updates(), 5);
    assert!(!host.has_pending_update());
}

#[test]
#[should_panic(expected = "chained self-updates")]
fn runaway_self_updates_panic() {
    let host = ComponentHost::new();
    let probe = RenderProbe::new();
    probe.request_during_next_updates(100);

    host.update(
        Transition::immediate(),
        counter(2, &probe),
        provide(TestEnvironment::light()),
        CONTAINER,
    );
}

#[test]
fn request_after_host_dropped_is_ignored() {
    let probe = RenderProbe::new();
    {
        let host = ComponentHost::new();
        host.update(
            Transition::immediate(),
            counter(2, &probe),
            provide(TestEnvironment::light()),
            CONTAINER,
        );
    }

    let state = probe.state().expect("rendered state");
    state
        .mutate(Transition::immediate(), |counter: &mut CounterState| {
            counter.count += 1
        })
        .expect("counter state");

    assert_eq!(probe.updates(), 1);
    assert_eq!(state.with(|counter: &CounterState| counter.count), Ok(3));
}
