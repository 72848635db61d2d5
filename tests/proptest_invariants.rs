//! Property-based invariant tests for the host-side state machines.
//!
//! Verifies:
//! 1. A revealed region stays revealed while every scroll goes down.
//! 2. Exiting a revealed region conceals it iff the last scroll went up.
//! 3. Each derived direction is Up iff the offset decreased.
//! 4. Rain column count is floor(W / cell) across arbitrary resizes.
//! 5. The frame throttle never exceeds its target rate.
//! 6. Unmount is idempotent and silences the coordinator.
#![cfg(not(target_arch = "wasm32"))]

use portfolio_wasm::frame::FrameThrottle;
use portfolio_wasm::rain::{column_count, RainField, RainSettings};
use portfolio_wasm::reveal::{RevealConfig, RevealCoordinator, RevealTransition};
use portfolio_wasm::scroll::{directions_from_offsets, ScrollDirection, ScrollHub};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Event {
    Scroll(f64),
    Intersect(bool),
}

fn arb_offset() -> impl Strategy<Value = f64> {
    0.0f64..20_000.0
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_offset().prop_map(Event::Scroll),
        any::<bool>().prop_map(Event::Intersect),
    ]
}

fn mounted(baseline: f64) -> (RevealCoordinator, ScrollHub) {
    let mut coordinator = RevealCoordinator::new(RevealConfig::default());
    coordinator.mount(baseline);
    (coordinator, ScrollHub::new(baseline))
}

proptest! {
    #[test]
    fn reveal_is_sticky_while_scrolling_down(
        baseline in arb_offset(),
        steps in prop::collection::vec((1.0f64..500.0, any::<bool>()), 1..64),
    ) {
        let (mut coordinator, hub) = mounted(baseline);
        coordinator.on_intersection(true);
        prop_assert!(coordinator.is_revealed());

        let mut offset = baseline;
        for (delta, intersecting) in steps {
            offset += delta;
            let sample = hub.publish(offset);
            prop_assert_eq!(sample.direction, ScrollDirection::Down);
            coordinator.on_scroll(sample);
            coordinator.on_intersection(intersecting);
            prop_assert!(coordinator.is_revealed());
        }
    }

    #[test]
    fn exit_conceals_iff_last_scroll_went_up(
        baseline in arb_offset(),
        events in prop::collection::vec(arb_event(), 1..96),
    ) {
        let (mut coordinator, hub) = mounted(baseline);
        for event in events {
            match event {
                Event::Scroll(offset) => coordinator.on_scroll(hub.publish(offset)),
                Event::Intersect(true) => {
                    coordinator.on_intersection(true);
                    prop_assert!(coordinator.is_revealed());
                }
                Event::Intersect(false) => {
                    let was = coordinator.is_revealed();
                    let going_up = hub.latest().direction == ScrollDirection::Up;
                    let transition = coordinator.on_intersection(false);
                    if was {
                        prop_assert_eq!(coordinator.is_revealed(), !going_up);
                        prop_assert_eq!(
                            transition,
                            going_up.then_some(RevealTransition::Concealed)
                        );
                    } else {
                        prop_assert!(!coordinator.is_revealed());
                        prop_assert_eq!(transition, None);
                    }
                }
            }
        }
    }

    #[test]
    fn directions_follow_offset_deltas(offsets in prop::collection::vec(arb_offset(), 0..64)) {
        let directions = directions_from_offsets(&offsets);
        prop_assert_eq!(directions.len(), offsets.len().saturating_sub(1));
        for (pair, direction) in offsets.windows(2).zip(&directions) {
            let expected = if pair[1] < pair[0] {
                ScrollDirection::Up
            } else {
                ScrollDirection::Down
            };
            prop_assert_eq!(*direction, expected);
        }
    }

    #[test]
    fn rain_columns_track_width(
        seed in any::<u64>(),
        sizes in prop::collection::vec((0.0f64..4000.0, 0.0f64..3000.0), 1..16),
    ) {
        let settings = RainSettings::default();
        let (w0, h0) = sizes[0];
        let mut field = RainField::new(w0, h0, settings.clone(), seed);
        prop_assert_eq!(field.columns(), (w0 / 14.0).floor() as usize);

        for &(w, h) in &sizes[1..] {
            field.resize(w, h);
            prop_assert_eq!(field.columns(), (w / 14.0).floor() as usize);
            prop_assert_eq!(field.columns(), column_count(w, settings.cell_size));
            prop_assert_eq!(field.drops().len(), field.columns());
        }
    }

    #[test]
    fn throttle_never_exceeds_target_rate(
        fps in 1.0f64..120.0,
        gaps in prop::collection::vec(0.1f64..50.0, 1..512),
    ) {
        let mut throttle = FrameThrottle::new(fps);
        let mut now = 0.0;
        let mut accepted = 0usize;
        for gap in gaps {
            now += gap;
            if throttle.accept(now) {
                accepted += 1;
            }
        }
        let ceiling = now / throttle.interval_ms() + 1.0;
        prop_assert!((accepted as f64) <= ceiling, "{accepted} frames in {now} ms");
    }

    #[test]
    fn unmount_is_idempotent(
        baseline in arb_offset(),
        repeats in 1usize..5,
        late in prop::collection::vec(arb_event(), 0..16),
    ) {
        let (mut coordinator, hub) = mounted(baseline);
        coordinator.on_intersection(true);
        for _ in 0..repeats {
            coordinator.unmount();
            prop_assert!(!coordinator.is_observing());
        }

        let frozen = *coordinator.state();
        for event in late {
            match event {
                Event::Scroll(offset) => coordinator.on_scroll(hub.publish(offset)),
                Event::Intersect(hit) => {
                    prop_assert_eq!(coordinator.on_intersection(hit), None);
                }
            }
        }
        prop_assert_eq!(*coordinator.state(), frozen);

        let mut never_mounted = RevealCoordinator::default();
        never_mounted.unmount();
        never_mounted.unmount();
        prop_assert!(!never_mounted.is_observing());
    }
}
