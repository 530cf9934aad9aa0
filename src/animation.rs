//! Frame-driven rotation plus a periodic cross-fade through a cyclic sequence of gems.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    config::GemConfig,
    geometry::{build_pillar_mesh, Mesh},
    palette::{resolve_pillar_palette, PaletteOverrides, PaletteParams, ShapeOverrides},
    pillar::PillarCode,
    projector::Projector,
    raster::{DrawBackend, FacetRasterizer, RenderStats, View},
};

/// One gem in a sequence: the pillar plus anything that replaces its table defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemEntry {
    pub pillar: PillarCode,
    #[serde(default)]
    pub palette: PaletteOverrides,
    #[serde(default)]
    pub shape: Option<ShapeOverrides>,
}

impl GemEntry {
    pub fn new(pillar: PillarCode) -> Self {
        Self {
            pillar,
            palette: PaletteOverrides::default(),
            shape: None,
        }
    }

    pub fn with_palette(self, palette: PaletteOverrides) -> Self {
        Self { palette, ..self }
    }

    pub fn with_shape(self, shape: ShapeOverrides) -> Self {
        Self {
            shape: Some(shape),
            ..self
        }
    }

    fn load(&self) -> (Mesh, PaletteParams) {
        (
            build_pillar_mesh(&self.pillar, self.shape.as_ref()),
            resolve_pillar_palette(&self.pillar, &self.palette),
        )
    }
}

/// Gems shown in turn, wrapping around after the last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GemSequence {
    entries: Vec<GemEntry>,
}

impl GemSequence {
    pub fn new(entries: Vec<GemEntry>) -> Self {
        Self { entries }
    }

    pub fn from_pillars(pillars: impl IntoIterator<Item = PillarCode>) -> Self {
        Self::new(pillars.into_iter().map(GemEntry::new).collect())
    }

    /// The four pillars of a chart, year first.
    pub fn chart(year: PillarCode, month: PillarCode, day: PillarCode, hour: PillarCode) -> Self {
        Self::from_pillars([year, month, day, hour])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GemEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[GemEntry] {
        &self.entries
    }

    pub fn next_index(&self, index: usize) -> usize {
        if self.entries.is_empty() {
            0
        } else {
            (index + 1) % self.entries.len()
        }
    }
}

/// Shared stop flag. Every clone sees the same flag; cancelling twice is harmless.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Shared home of a frame callback that queues itself again from inside.
///
/// A callback holding a clone of its own slot keeps itself alive; `release` breaks that
/// cycle once no frame can call it any more.
pub struct FrameSlot<T>(Rc<RefCell<Option<T>>>);

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    pub fn set(&self, callback: T) {
        *self.0.borrow_mut() = Some(callback);
    }

    /// Runs `f` on the stored callback, if any.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.0.borrow().as_ref().map(f)
    }

    pub fn release(&self) -> Option<T> {
        self.0.borrow_mut().take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl<T> Clone for FrameSlot<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct RendererState {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub time: f32,
    pub mesh: Mesh,
    pub palette: PaletteParams,
    pub opacity: f32,
    pub index: usize,
    pub last_swap: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The handle was cancelled; nothing was touched.
    Cancelled,
    Rendered {
        stats: RenderStats,
        /// A new sequence entry was loaded this frame.
        morphed: bool,
    },
}

pub struct AnimationDriver<C: Clock> {
    config: GemConfig,
    rasterizer: FacetRasterizer,
    sequence: GemSequence,
    clock: C,
    cancel: CancelHandle,
    state: RendererState,
    lift: f32,
}

impl<C: Clock> AnimationDriver<C> {
    pub fn new(config: GemConfig, sequence: GemSequence, clock: C) -> Self {
        let (mesh, palette) = match sequence.get(0) {
            Some(entry) => entry.load(),
            None => {
                log::warn!("empty gem sequence, frames will only clear");
                (Mesh::empty(), PaletteParams::neutral())
            }
        };
        let state = RendererState {
            rotation_x: config.rotation_x(0.0),
            rotation_y: 0.0,
            time: 0.0,
            mesh,
            palette,
            opacity: 1.0,
            index: 0,
            last_swap: clock.now(),
        };

        Self {
            rasterizer: FacetRasterizer::new(Projector::from_config(&config)),
            config,
            sequence,
            clock,
            cancel: CancelHandle::new(),
            state,
            lift: 0.0,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> &RendererState {
        &self.state
    }

    pub fn sequence(&self) -> &GemSequence {
        &self.sequence
    }

    pub fn config(&self) -> &GemConfig {
        &self.config
    }

    pub fn set_lift(&mut self, lift: f32) {
        self.lift = lift;
    }

    fn advance(&mut self) {
        let index = self.sequence.next_index(self.state.index);
        if let Some(entry) = self.sequence.get(index) {
            let (mesh, palette) = entry.load();
            log::info!("morphing to {} (entry {index})", entry.pillar);
            self.state.mesh = mesh;
            self.state.palette = palette;
        }
        self.state.index = index;
    }

    /// Advances time by one step and renders a frame, unless cancelled.
    pub fn frame(&mut self, backend: &mut impl DrawBackend) -> FrameOutcome {
        if self.cancel.is_cancelled() {
            return FrameOutcome::Cancelled;
        }

        let config = &self.config;
        let state = &mut self.state;
        state.time += config.time_step;
        state.rotation_x = config.rotation_x(state.time);
        state.rotation_y = config.rotation_y(state.time);

        let now = self.clock.now();
        let interval = Duration::from_millis(config.morph_interval_ms);
        let mut morphed = false;
        if now.saturating_sub(state.last_swap) > interval {
            state.opacity = (state.opacity - config.fade_step).max(0.0);
            if state.opacity <= 0.0 {
                state.last_swap = now;
                morphed = true;
            }
        } else if state.opacity < 1.0 {
            state.opacity = (state.opacity + config.fade_step).min(1.0);
        }
        if morphed {
            self.advance();
        }

        let view = View::new(self.state.rotation_x, self.state.rotation_y).lifted(self.lift);
        let palette = self.state.palette.faded(self.state.opacity);
        let stats = self
            .rasterizer
            .render(backend, &self.state.mesh, &view, &palette);

        FrameOutcome::Rendered { stats, morphed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, raster::RecordingBackend};

    fn driver(clock: ManualClock) -> AnimationDriver<ManualClock> {
        let sequence = GemSequence::from_pillars(
            ["甲子", "丙午", "庚申"].map(|p| PillarCode::parse(p).unwrap()),
        );
        AnimationDriver::new(GemConfig::default(), sequence, clock)
    }

    #[test]
    fn rotation_follows_time() {
        let mut driver = driver(ManualClock::new());
        let mut backend = RecordingBackend::new(400.0);
        for _ in 0..100 {
            driver.frame(&mut backend);
        }
        let state = driver.state();
        assert!((state.time - 1.0).abs() < 1e-4);
        assert!((state.rotation_y - 0.4).abs() < 1e-4);
        assert!((state.rotation_x - (0.3f32.sin() * 0.2 + 0.3)).abs() < 1e-4);
    }

    #[test]
    fn no_fade_before_interval() {
        let clock = ManualClock::new();
        let mut driver = driver(clock.clone());
        let mut backend = RecordingBackend::new(400.0);
        clock.advance_ms(3000);
        driver.frame(&mut backend);
        assert_eq!(driver.state().opacity, 1.0);
        clock.advance_ms(1);
        driver.frame(&mut backend);
        assert!(driver.state().opacity < 1.0);
    }

    #[test]
    fn wraps_after_last_entry() {
        let sequence = GemSequence::from_pillars([PillarCode::new("甲", "子")]);
        assert_eq!(sequence.next_index(0), 0);
        assert_eq!(GemSequence::default().next_index(3), 0);
    }

    #[test]
    fn cancelled_driver_does_not_render() {
        let mut driver = driver(ManualClock::new());
        let handle = driver.cancel_handle();
        handle.cancel();
        handle.cancel();
        let mut backend = RecordingBackend::new(400.0);
        assert_eq!(driver.frame(&mut backend), FrameOutcome::Cancelled);
        assert!(backend.calls.is_empty());
        assert_eq!(driver.state().time, 0.0);
    }

    #[test]
    fn released_slot_frees_its_callback() {
        let scene = Rc::new(());
        let slot: FrameSlot<Box<dyn Fn() -> usize>> = FrameSlot::new();
        let next = slot.clone();
        let captured = scene.clone();
        slot.set(Box::new(move || {
            let _ = (&next, &captured);
            Rc::strong_count(&captured)
        }));
        assert_eq!(slot.with(|callback| callback()), Some(2));

        drop(slot.release());
        assert!(slot.is_empty());
        assert_eq!(slot.with(|callback| callback()), None);
        assert_eq!(Rc::strong_count(&scene), 1);
    }

    #[test]
    fn sequence_entries_deserialize() {
        let sequence: GemSequence =
            serde_json::from_str(r#"[{ "pillar": { "stem": "壬", "branch": "子" } }]"#).unwrap();
        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence.get(0).unwrap().pillar, PillarCode::new("壬", "子"));
    }
}
