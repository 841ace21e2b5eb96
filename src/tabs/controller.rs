use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{
    domain::{IndicatorState, TabId, TabResult},
    icon::{icon_for, IconSink},
    tabs::store::ResultStore,
};

/// Reconciles asynchronous classification results with the tab the user is
/// actually looking at. Every decision about what the toolbar shows runs
/// through here, and every handler is atomic: it holds the state lock from
/// first read to final render, so a response application can never interleave
/// mid-decision with a tab switch.
pub struct TabController {
    store: Arc<ResultStore>,
    icons: Arc<dyn IconSink>,
    state: Mutex<TrackerState>,
}

#[derive(Default)]
struct TrackerState {
    active_tab: Option<TabId>,
    /// Classification requests still in flight, per tab.
    in_flight: HashMap<TabId, u32>,
    /// Tabs closed while a request was still in flight. Results for these are
    /// dropped instead of recreating an entry for a dead tab; the marker is
    /// erased once the last request settles or the browser reuses the id.
    closed_in_flight: HashSet<TabId>,
}

impl TrackerState {
    fn settle(&mut self, tab: TabId) {
        if let Some(count) = self.in_flight.get_mut(&tab) {
            *count -= 1;
            if *count == 0 {
                self.in_flight.remove(&tab);
                self.closed_in_flight.remove(&tab);
            }
        }
    }
}

impl TabController {
    pub fn new(store: Arc<ResultStore>, icons: Arc<dyn IconSink>) -> Self {
        Self {
            store,
            icons,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// A classification request is about to go out for this tab.
    pub fn handle_navigation_started(&self, tab: TabId) {
        let mut state = self.state.lock();
        *state.in_flight.entry(tab).or_insert(0) += 1;
        // A navigation on a closed id means the browser reused it for a new tab.
        state.closed_in_flight.remove(&tab);
    }

    /// A classification response arrived. Stores it under the originating tab
    /// and updates the icon only if that tab is still the active one.
    pub fn handle_classification(&self, tab: TabId, result: TabResult) {
        let mut state = self.state.lock();
        let tab_closed = state.closed_in_flight.contains(&tab);
        state.settle(tab);

        if tab_closed {
            tracing::info!(target: "tabs", tab = %tab, "dropping result for closed tab");
            return;
        }

        self.store.put(tab, result);
        tracing::info!(
            target: "tabs",
            tab = %tab,
            stored = self.store.len(),
            "saved classification result"
        );

        if state.active_tab == Some(tab) {
            self.render(result.indicator());
        } else {
            tracing::debug!(
                target: "tabs",
                tab = %tab,
                active = ?state.active_tab,
                "result is for a background tab; icon unchanged"
            );
        }
    }

    /// Transport failure: nothing to store or render, bookkeeping only. The
    /// tab keeps whatever icon it had.
    pub fn handle_classification_failed(&self, tab: TabId) {
        self.state.lock().settle(tab);
    }

    /// The single authoritative recomputation point for what the icon shows.
    pub fn handle_tab_activated(&self, tab: TabId) {
        let mut state = self.state.lock();
        state.active_tab = Some(tab);

        match self.store.get(tab) {
            Some(result) => {
                tracing::debug!(target: "tabs", tab = %tab, "activated tab has a stored result");
                self.render(result.indicator());
            }
            None => {
                tracing::debug!(target: "tabs", tab = %tab, "no result for activated tab");
                self.render(IndicatorState::Unknown);
            }
        }
    }

    /// The active tab is left as-is: the browser reports the newly focused tab
    /// with its own activation event.
    pub fn handle_tab_removed(&self, tab: TabId) {
        let mut state = self.state.lock();
        if state.in_flight.contains_key(&tab) {
            state.closed_in_flight.insert(tab);
        }

        if self.store.remove(tab).is_some() {
            tracing::debug!(
                target: "tabs",
                tab = %tab,
                stored = self.store.len(),
                "dropped result for closed tab"
            );
        }
    }

    fn render(&self, state: IndicatorState) {
        tracing::debug!(target: "icon", state = ?state, "updating toolbar icon");
        self.icons.show(icon_for(state));
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        domain::{Classification, TrafficLight},
        icon::{IconSet, GRAY_ICONS, GREEN_ICONS, RED_ICONS},
    };

    #[derive(Default)]
    struct RecordingSink {
        shown: Mutex<Vec<IconSet>>,
    }

    impl RecordingSink {
        fn last(&self) -> Option<IconSet> {
            self.shown.lock().last().copied()
        }

        fn count(&self) -> usize {
            self.shown.lock().len()
        }
    }

    impl IconSink for RecordingSink {
        fn show(&self, icons: IconSet) {
            self.shown.lock().push(icons);
        }
    }

    fn setup() -> (Arc<ResultStore>, Arc<RecordingSink>, TabController) {
        let store = Arc::new(ResultStore::new());
        let sink = Arc::new(RecordingSink::default());
        let controller = TabController::new(store.clone(), sink.clone());
        (store, sink, controller)
    }

    fn classified(score: f64, light: TrafficLight) -> TabResult {
        TabResult::Classified(Classification {
            score,
            light,
            received_at: Utc::now(),
        })
    }

    #[test]
    fn activation_rerenders_the_same_icon_without_mutations() {
        let (_, sink, controller) = setup();
        controller.handle_navigation_started(TabId(7));
        controller.handle_classification(TabId(7), classified(0.9, TrafficLight::Safe));

        controller.handle_tab_activated(TabId(7));
        controller.handle_tab_activated(TabId(7));

        let shown = sink.shown.lock();
        assert_eq!(shown[shown.len() - 2..], [GREEN_ICONS, GREEN_ICONS]);
    }

    #[test]
    fn active_tab_result_renders_immediately() {
        let (store, sink, controller) = setup();
        controller.handle_tab_activated(TabId(7));
        assert_eq!(sink.last(), Some(GRAY_ICONS));

        let result = classified(0.9, TrafficLight::Safe);
        controller.handle_navigation_started(TabId(7));
        controller.handle_classification(TabId(7), result);

        assert_eq!(sink.last(), Some(GREEN_ICONS));
        assert_eq!(store.get(TabId(7)), Some(result));
    }

    #[test]
    fn background_tab_result_never_touches_the_icon() {
        let (store, sink, controller) = setup();
        controller.handle_tab_activated(TabId(9));
        let renders_before = sink.count();

        controller.handle_navigation_started(TabId(7));
        controller.handle_classification(TabId(7), classified(0.8, TrafficLight::Danger));

        assert_eq!(sink.count(), renders_before);
        assert_eq!(sink.last(), Some(GRAY_ICONS));
        assert!(store.get(TabId(7)).is_some());
    }

    #[test]
    fn removal_clears_the_stored_result() {
        let (store, _, controller) = setup();
        controller.handle_navigation_started(TabId(3));
        controller.handle_classification(TabId(3), classified(0.2, TrafficLight::Caution));

        controller.handle_tab_removed(TabId(3));
        assert_eq!(store.get(TabId(3)), None);

        // Removing again is a no-op.
        controller.handle_tab_removed(TabId(3));
        assert_eq!(store.get(TabId(3)), None);
    }

    #[test]
    fn last_response_to_arrive_wins() {
        let (store, sink, controller) = setup();
        controller.handle_tab_activated(TabId(7));
        controller.handle_navigation_started(TabId(7));
        controller.handle_navigation_started(TabId(7));

        let first = classified(0.9, TrafficLight::Safe);
        let second = classified(0.1, TrafficLight::Danger);
        controller.handle_classification(TabId(7), first);
        controller.handle_classification(TabId(7), second);

        assert_eq!(store.get(TabId(7)), Some(second));
        assert_eq!(sink.last(), Some(RED_ICONS));
    }

    #[test]
    fn response_for_a_closed_tab_is_dropped() {
        let (store, _, controller) = setup();
        controller.handle_navigation_started(TabId(7));
        controller.handle_tab_removed(TabId(7));

        controller.handle_classification(TabId(7), classified(0.9, TrafficLight::Safe));
        assert_eq!(store.get(TabId(7)), None);
    }

    #[test]
    fn reused_tab_id_accepts_results_again() {
        let (store, _, controller) = setup();
        controller.handle_navigation_started(TabId(7));
        controller.handle_tab_removed(TabId(7));

        // The browser reused id 7 for a fresh tab before the old response landed.
        let result = classified(0.5, TrafficLight::Caution);
        controller.handle_navigation_started(TabId(7));
        controller.handle_classification(TabId(7), result);

        assert_eq!(store.get(TabId(7)), Some(result));
    }

    #[test]
    fn inconclusive_result_is_stored_and_gated_like_success() {
        let (store, sink, controller) = setup();
        controller.handle_tab_activated(TabId(9));
        let renders_before = sink.count();

        controller.handle_navigation_started(TabId(7));
        controller.handle_classification(TabId(7), TabResult::Inconclusive);

        // Not rendered while another tab is active...
        assert_eq!(sink.count(), renders_before);
        assert_eq!(store.get(TabId(7)), Some(TabResult::Inconclusive));

        // ...but shows the error color once the tab comes to the front.
        controller.handle_tab_activated(TabId(7));
        assert_eq!(sink.last(), Some(GRAY_ICONS));
    }

    #[test]
    fn transport_failure_changes_nothing() {
        let (store, sink, controller) = setup();
        controller.handle_tab_activated(TabId(7));
        let renders_before = sink.count();

        controller.handle_navigation_started(TabId(7));
        controller.handle_classification_failed(TabId(7));

        assert_eq!(sink.count(), renders_before);
        assert_eq!(store.get(TabId(7)), None);
    }
}
