use crate::context::SimulationContext;
use crate::core::{GROUND_Y, MAX_TICK_SECS, Point, TRAILING_BUFFER_MS};
use crate::document::{AudioSettings, ShowSettings, WeatherSettings};
use crate::event::{LaunchEvent, LaunchEventDraft, LaunchEventPatch};
use crate::finale::{FinaleComposer, FinaleOptions};
use crate::firework::{FireworkEntity, RenderedRocket};
use crate::particle::RenderedParticle;

pub const MAX_LAUNCHERS: usize = 10;

/// Gap between the last scheduled event and a finale appended without an
/// explicit start time.
const FINALE_GAP_MS: f64 = 2000.0;

/// Default finale start on an empty timeline.
const FINALE_EMPTY_START_MS: f64 = 5000.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Launcher {
    pub id: u32,
    pub x: f64,
    pub enabled: bool,
}

impl Launcher {
    pub fn position(&self) -> Point {
        Point::new(self.x, GROUND_Y)
    }
}

/// Everything the host should draw this frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FrameSnapshot {
    pub time_ms: f64,
    pub rockets: Vec<RenderedRocket>,
    pub particles: Vec<RenderedParticle>,
}

/// The event timeline and the live simulation it drives. Owns the scheduled
/// events (kept sorted by time), the live entities, and the injected
/// collaborator context; one `advance` call is one cooperative tick.
pub struct ShowTimeline {
    events: Vec<LaunchEvent>,
    launchers: Vec<Launcher>,
    live: Vec<FireworkEntity>,
    ctx: SimulationContext,

    current_time_ms: f64,
    duration_ms: f64,
    playing: bool,
    looping: bool,
    speed: f64,
    next_event_id: u64,

    // Host-level document sections, carried for round-trip fidelity.
    pub settings: ShowSettings,
    pub weather: Option<WeatherSettings>,
    pub audio: Option<AudioSettings>,
}

impl Default for ShowTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowTimeline {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            launchers: vec![
                Launcher { id: 1, x: 200.0, enabled: true },
                Launcher { id: 2, x: 400.0, enabled: true },
                Launcher { id: 3, x: 600.0, enabled: true },
            ],
            live: Vec::new(),
            ctx: SimulationContext::new(),
            current_time_ms: 0.0,
            duration_ms: TRAILING_BUFFER_MS,
            playing: false,
            looping: false,
            speed: 1.0,
            next_event_id: 1,
            settings: ShowSettings::default(),
            weather: None,
            audio: None,
        }
    }

    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.ctx
    }

    pub fn set_context(&mut self, ctx: SimulationContext) {
        self.ctx = ctx;
    }

    // ----- event CRUD -----

    /// Inserts a new event, filling defaults, clamping the time and
    /// assigning the next free id. Returns the stored event.
    pub fn add_event(&mut self, draft: LaunchEventDraft) -> LaunchEvent {
        self.add_event_with_id(draft, None)
    }

    pub(crate) fn add_event_with_id(
        &mut self,
        draft: LaunchEventDraft,
        id: Option<u64>,
    ) -> LaunchEvent {
        let id = match id {
            Some(id) => {
                self.next_event_id = self.next_event_id.max(id + 1);
                id
            }
            None => {
                let id = self.next_event_id;
                self.next_event_id += 1;
                id
            }
        };
        let default_launcher = self.launchers.first().map_or(1, |l| l.id);
        let event = draft.resolve(id, default_launcher);
        self.events.push(event.clone());
        self.resort_and_recompute();
        event
    }

    /// Merges the patch into the event, resets its `triggered` flag and
    /// restores ordering. Returns false when the id is unknown.
    pub fn update_event(&mut self, id: u64, patch: &LaunchEventPatch) -> bool {
        let Some(event) = self.events.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        patch.apply(event);
        event.triggered = false;
        self.resort_and_recompute();
        true
    }

    pub fn remove_event(&mut self, id: u64) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = self.events.len() != before;
        if removed {
            self.resort_and_recompute();
        }
        removed
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.resort_and_recompute();
    }

    pub fn get_event(&self, id: u64) -> Option<&LaunchEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Time-sorted snapshot of the schedule.
    pub fn event_list(&self) -> &[LaunchEvent] {
        &self.events
    }

    fn resort_and_recompute(&mut self) {
        // Stable sort on time only: same-time events keep insertion order.
        self.events
            .sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        let last = self
            .events
            .iter()
            .map(|e| e.time_ms)
            .fold(f64::NEG_INFINITY, f64::max);
        self.duration_ms = if self.events.is_empty() {
            TRAILING_BUFFER_MS
        } else {
            last + TRAILING_BUFFER_MS
        };
    }

    // ----- launchers -----

    pub fn launchers(&self) -> &[Launcher] {
        &self.launchers
    }

    /// Adds a launcher at the given x. Returns its id, or `None` at the
    /// capacity bound.
    pub fn add_launcher(&mut self, x: f64) -> Option<u32> {
        if self.launchers.len() >= MAX_LAUNCHERS {
            return None;
        }
        let id = self.launchers.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        self.launchers.push(Launcher {
            id,
            x,
            enabled: true,
        });
        Some(id)
    }

    /// Removes a launcher. The last remaining launcher cannot be removed.
    pub fn remove_launcher(&mut self, id: u32) -> bool {
        if self.launchers.len() <= 1 {
            return false;
        }
        let before = self.launchers.len();
        self.launchers.retain(|l| l.id != id);
        self.launchers.len() != before
    }

    pub fn set_launcher_enabled(&mut self, id: u32, enabled: bool) -> bool {
        match self.launchers.iter_mut().find(|l| l.id == id) {
            Some(l) => {
                l.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn launcher(&self, id: u32) -> Option<&Launcher> {
        self.launchers.iter().find(|l| l.id == id)
    }

    /// Wholesale launcher replacement for document load, capped at the
    /// capacity bound. An empty input keeps the existing set.
    pub(crate) fn replace_launchers(&mut self, launchers: &[Launcher]) {
        if launchers.is_empty() {
            return;
        }
        self.launchers = launchers.iter().copied().take(MAX_LAUNCHERS).collect();
    }

    // ----- transport -----

    pub fn play(&mut self) {
        if self.current_time_ms >= self.duration_ms {
            self.current_time_ms = 0.0;
            self.reset_triggers();
            self.live.clear();
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.current_time_ms = 0.0;
        self.live.clear();
        self.reset_triggers();
    }

    /// Jumps the clock. Events before the seek point are treated as already
    /// fired; in-flight fireworks are discarded, not reconstructed.
    #[tracing::instrument(skip(self))]
    pub fn seek(&mut self, time_ms: f64) {
        let time_ms = time_ms.clamp(0.0, self.duration_ms);
        self.current_time_ms = time_ms;
        for e in &mut self.events {
            e.triggered = e.time_ms < time_ms;
        }
        self.live.clear();
    }

    pub fn set_speed(&mut self, multiplier: f64) {
        self.speed = multiplier.max(0.0);
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn current_time_ms(&self) -> f64 {
        self.current_time_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Phases of the live entities, in launch order.
    pub fn live_phases(&self) -> Vec<crate::firework::Phase> {
        self.live.iter().map(FireworkEntity::phase).collect()
    }

    fn reset_triggers(&mut self) {
        for e in &mut self.events {
            e.triggered = false;
        }
    }

    // ----- simulation -----

    /// One cooperative tick: advance the clock, fire due events in time
    /// order, integrate every live entity, prune the finished, handle
    /// looping and end-of-show. No-op while not playing.
    pub fn advance(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        let dt = dt.clamp(0.0, MAX_TICK_SECS);
        self.current_time_ms += dt * 1000.0 * self.speed;

        self.fire_due_events();

        for entity in &mut self.live {
            entity.advance(dt, &mut self.ctx);
        }
        self.live.retain(|e| !e.is_finished());

        if self.current_time_ms >= self.duration_ms {
            if self.looping {
                self.current_time_ms = 0.0;
                self.reset_triggers();
            } else {
                // Hold at the end until every live firework finishes,
                // then come to rest.
                self.current_time_ms = self.duration_ms;
                if self.live.is_empty() {
                    self.playing = false;
                }
            }
        }
    }

    /// The event list is sorted and scanned in order, so events fire in
    /// non-decreasing time order; same-time events fire in insertion order.
    fn fire_due_events(&mut self) {
        let due: Vec<usize> = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.triggered && self.current_time_ms >= e.time_ms)
            .map(|(i, _)| i)
            .collect();

        for i in due {
            self.events[i].triggered = true;
            let event = self.events[i].clone();
            let Some(launcher) = self.launchers.iter().find(|l| l.id == event.launcher_id) else {
                // Dangling launcher reference: skip, never fail the tick.
                tracing::debug!(event_id = event.id, launcher_id = event.launcher_id, "no launcher");
                continue;
            };
            if !launcher.enabled {
                continue;
            }
            let position = launcher.position();
            tracing::debug!(
                event_id = event.id,
                time_ms = event.time_ms,
                firework_type = event.firework_type.name(),
                "launch"
            );
            self.live
                .push(FireworkEntity::launch(&event, position, &mut self.ctx));
        }
    }

    /// Aggregated draw state for the host render loop.
    pub fn render_frame(&self) -> FrameSnapshot {
        let mut rockets = Vec::new();
        let mut particles = Vec::new();
        for entity in &self.live {
            let frame = entity.render();
            if let Some(rocket) = frame.rocket {
                rockets.push(rocket);
            }
            particles.extend(frame.particles);
        }
        FrameSnapshot {
            time_ms: self.current_time_ms,
            rockets,
            particles,
        }
    }

    // ----- finale -----

    /// Composes a finale and appends its events. Returns the new event ids.
    pub fn add_finale_with_options(&mut self, options: &FinaleOptions) -> Vec<u64> {
        let default_start = match self.events.last() {
            None => FINALE_EMPTY_START_MS,
            Some(last) => last.time_ms + FINALE_GAP_MS,
        };
        let launcher_ids: Vec<u32> = self
            .launchers
            .iter()
            .filter(|l| l.enabled)
            .map(|l| l.id)
            .collect();

        FinaleComposer::compose(options, &launcher_ids, default_start)
            .into_iter()
            .map(|draft| self.add_event(draft).id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FireworkType;

    fn draft(time_ms: f64) -> LaunchEventDraft {
        LaunchEventDraft::at(time_ms)
    }

    #[test]
    fn events_stay_sorted_under_mutation() {
        let mut show = ShowTimeline::new();
        for t in [5000.0, 1000.0, 3000.0, 1000.0, 0.0] {
            show.add_event(draft(t));
        }
        let times: Vec<f64> = show.event_list().iter().map(|e| e.time_ms).collect();
        assert_eq!(times, vec![0.0, 1000.0, 1000.0, 3000.0, 5000.0]);
    }

    #[test]
    fn same_time_events_keep_insertion_order() {
        let mut show = ShowTimeline::new();
        let a = show.add_event(draft(1000.0)).id;
        let b = show.add_event(draft(1000.0)).id;
        let ids: Vec<u64> = show.event_list().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn update_repositions_and_clears_trigger() {
        let mut show = ShowTimeline::new();
        let first = show.add_event(draft(1000.0)).id;
        show.add_event(draft(2000.0));
        show.add_event(draft(3000.0));

        show.play();
        for _ in 0..12 {
            show.advance(0.1); // 1200 ms, fires the 1000 ms event
        }
        assert!(show.get_event(first).unwrap().triggered);

        assert!(show.update_event(first, &LaunchEventPatch::time(2500.0)));
        let e = show.get_event(first).unwrap();
        assert_eq!(e.time_ms, 2500.0);
        assert!(!e.triggered);
        let times: Vec<f64> = show.event_list().iter().map(|e| e.time_ms).collect();
        assert_eq!(times, vec![2000.0, 2500.0, 3000.0]);
    }

    #[test]
    fn duration_tracks_mutations() {
        let mut show = ShowTimeline::new();
        assert_eq!(show.duration_ms(), 5000.0);

        show.add_event(draft(1000.0));
        let id = show.add_event(draft(8000.0)).id;
        assert_eq!(show.duration_ms(), 13000.0);

        show.remove_event(id);
        assert_eq!(show.duration_ms(), 6000.0);

        show.clear_events();
        assert_eq!(show.duration_ms(), 5000.0);
    }

    #[test]
    fn advance_is_noop_while_not_playing() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(0.0));
        show.advance(1.0);
        assert_eq!(show.current_time_ms(), 0.0);
        assert_eq!(show.live_count(), 0);
    }

    #[test]
    fn due_events_fire_and_entities_spawn() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(0.0));
        show.add_event(draft(50.0));
        show.add_event(draft(9000.0));

        show.play();
        show.advance(0.1);
        assert_eq!(show.live_count(), 2);
        assert_eq!(
            show.event_list().iter().filter(|e| e.triggered).count(),
            2
        );
    }

    #[test]
    fn dt_is_clamped() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(0.0));
        show.play();
        show.advance(10.0);
        assert_eq!(show.current_time_ms(), 100.0);
    }

    #[test]
    fn speed_scales_the_clock() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(6000.0));
        show.set_speed(2.0);
        show.play();
        show.advance(0.05);
        assert_eq!(show.current_time_ms(), 100.0);
    }

    #[test]
    fn seek_marks_earlier_events_as_fired() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(1000.0));
        show.add_event(draft(2000.0));
        show.add_event(draft(3000.0));

        show.play();
        show.seek(2000.0);
        assert_eq!(show.live_count(), 0);

        // Strictly-earlier events are treated as fired and never relaunch;
        // the event exactly at the seek point fires on the next tick.
        show.advance(0.0);
        let triggered: Vec<f64> = show
            .event_list()
            .iter()
            .filter(|e| e.triggered)
            .map(|e| e.time_ms)
            .collect();
        assert_eq!(triggered, vec![1000.0, 2000.0]);
        assert_eq!(show.live_count(), 1);
    }

    #[test]
    fn seek_clamps_into_show_bounds() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(1000.0));
        show.seek(99999.0);
        assert_eq!(show.current_time_ms(), show.duration_ms());
        show.seek(-5.0);
        assert_eq!(show.current_time_ms(), 0.0);
    }

    #[test]
    fn stop_resets_everything_transient() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(0.0));
        show.play();
        show.advance(0.1);
        assert!(show.live_count() > 0);

        show.stop();
        assert!(!show.is_playing());
        assert_eq!(show.current_time_ms(), 0.0);
        assert_eq!(show.live_count(), 0);
        assert!(show.event_list().iter().all(|e| !e.triggered));
    }

    #[test]
    fn show_waits_for_live_entities_before_stopping() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(0.0).firework_type(FireworkType::Peony));
        // At 4x the clock hits the 5000 ms duration long before the
        // real-time entity finishes.
        show.set_speed(4.0);
        show.play();

        let mut reached_end_while_live = false;
        let mut steps = 0;
        while show.is_playing() && steps < 2000 {
            show.advance(0.016);
            if show.current_time_ms() >= show.duration_ms() && show.live_count() > 0 {
                reached_end_while_live = true;
            }
            steps += 1;
        }
        assert!(reached_end_while_live);
        assert!(!show.is_playing());
        assert_eq!(show.live_count(), 0);
        assert_eq!(show.current_time_ms(), show.duration_ms());
    }

    #[test]
    fn looping_wraps_and_rearms_events() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(0.0));
        show.set_loop(true);
        show.play();

        for _ in 0..70 {
            show.advance(0.1); // 7 s total, past the 5 s duration
        }
        assert!(show.is_playing());
        assert!(show.current_time_ms() < show.duration_ms());
    }

    #[test]
    fn play_after_end_restarts() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(0.0).firework_type(FireworkType::Peony));
        show.play();
        let mut steps = 0;
        while show.is_playing() && steps < 5000 {
            show.advance(0.016);
            steps += 1;
        }
        assert!(!show.is_playing());
        show.play();
        assert_eq!(show.current_time_ms(), 0.0);
        assert!(show.event_list().iter().all(|e| !e.triggered));
    }

    #[test]
    fn disabled_launcher_suppresses_launch() {
        let mut show = ShowTimeline::new();
        show.set_launcher_enabled(1, false);
        show.add_event(draft(0.0).launcher(1));
        show.play();
        show.advance(0.05);
        assert_eq!(show.live_count(), 0);
        // The event is still consumed.
        assert!(show.event_list()[0].triggered);
    }

    #[test]
    fn launcher_capacity_is_bounded() {
        let mut show = ShowTimeline::new();
        while show.launchers().len() < MAX_LAUNCHERS {
            assert!(show.add_launcher(100.0).is_some());
        }
        assert_eq!(show.add_launcher(100.0), None);

        while show.launchers().len() > 1 {
            let id = show.launchers()[0].id;
            assert!(show.remove_launcher(id));
        }
        let last = show.launchers()[0].id;
        assert!(!show.remove_launcher(last));
    }

    #[test]
    fn render_frame_reflects_live_entities() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(0.0));
        show.play();
        show.advance(0.05);
        let frame = show.render_frame();
        assert_eq!(frame.rockets.len(), 1);
        assert!(frame.particles.is_empty());
    }

    #[test]
    fn finale_on_empty_timeline_starts_at_five_seconds() {
        let mut show = ShowTimeline::new();
        let ids = show.add_finale_with_options(&FinaleOptions {
            count: 10,
            duration_window_ms: 10000.0,
            ..FinaleOptions::default()
        });
        assert_eq!(ids.len(), 10);
        let times: Vec<f64> = show.event_list().iter().map(|e| e.time_ms).collect();
        for (i, t) in times.iter().enumerate() {
            assert!((t - (5000.0 + i as f64 * 1000.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn finale_after_events_leaves_a_gap() {
        let mut show = ShowTimeline::new();
        show.add_event(draft(4000.0));
        show.add_finale_with_options(&FinaleOptions {
            count: 3,
            duration_window_ms: 3000.0,
            ..FinaleOptions::default()
        });
        // First finale event sits at last + 2000.
        assert!((show.event_list()[1].time_ms - 6000.0).abs() < 1e-9);
    }
}
