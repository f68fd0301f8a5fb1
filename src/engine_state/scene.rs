//! # Scene Surface
//!
//! The contract between the simulation core and whatever draws it. The core
//! only ever *writes* to this surface: it adds and removes renderable proxies
//! for blocks, toggles the highlight on the targeted block, and moves the ghost
//! preview. It never reads anything back.
//!
//! Coordinates name cells, not centers: the block at `c` fills
//! `[c, c + 1)` on every axis, so its proxy (and the highlight and ghost
//! drawn for it) is a unit cube centered at `c + 0.5`. See [`proxy_center`].
//!
//! Three implementations ship with the crate:
//! - `NullScene` discards everything (headless simulation)
//! - `LoggingScene` traces every command through `log`
//! - `RecordingScene` appends every command to a shared buffer, which the
//!   presentation layer (or a test) can drain

use cgmath::Point3;
use log::trace;

use crate::core::StResource;

use super::voxels::block::{block_type::BlockType, Coordinate};

/// World-space center of the unit cube drawn for the cell `coordinate`.
pub fn proxy_center(coordinate: Coordinate) -> Point3<f32> {
    Point3::new(
        coordinate.x as f32 + 0.5,
        coordinate.y as f32 + 0.5,
        coordinate.z as f32 + 0.5,
    )
}

/// Color used for the highlighted (targeted) block.
pub const SELECTED_COLOR: u32 = 0xffaa00;

/// How a renderable block proxy should look.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisualStyle {
    /// 0xRRGGBB base color.
    pub color: u32,
    /// Whether the proxy should be drawn see-through.
    pub transparent: bool,
}

impl From<&BlockType> for VisualStyle {
    fn from(block_type: &BlockType) -> Self {
        VisualStyle {
            color: block_type.color,
            transparent: block_type.transparent,
        }
    }
}

/// Material variant applied to a targeted block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HighlightStyle {
    /// The block the camera is currently looking at.
    Selected,
}

impl HighlightStyle {
    /// Color of the variant.
    pub fn color(self) -> u32 {
        match self {
            HighlightStyle::Selected => SELECTED_COLOR,
        }
    }
}

/// Write-only render surface consumed by the core.
///
/// Every `coordinate` passed here is a cell whose cube spans
/// `[c, c + 1)`; draw it centered at [`proxy_center`]`(c)`, not at `c`.
pub trait SceneSurface {
    /// A block now exists at `coordinate`; its proxy is centered at `c + 0.5`.
    fn add_renderable(&mut self, coordinate: Coordinate, style: VisualStyle);
    /// The block at `coordinate` is gone.
    fn remove_renderable(&mut self, coordinate: Coordinate);
    /// Applies (or with `None`, reverts) a highlight on the block at `coordinate`.
    fn set_highlight(&mut self, coordinate: Coordinate, variant: Option<HighlightStyle>);
    /// Shows the ghost preview at `coordinate`, or hides it with `None`.
    fn set_ghost(&mut self, coordinate: Option<Coordinate>, color: u32);
}

/// Scene that ignores every command.
#[derive(Debug, Default)]
pub struct NullScene;

impl SceneSurface for NullScene {
    fn add_renderable(&mut self, _coordinate: Coordinate, _style: VisualStyle) {}
    fn remove_renderable(&mut self, _coordinate: Coordinate) {}
    fn set_highlight(&mut self, _coordinate: Coordinate, _variant: Option<HighlightStyle>) {}
    fn set_ghost(&mut self, _coordinate: Option<Coordinate>, _color: u32) {}
}

/// Scene that traces every command. Useful for headless runs with `RUST_LOG=trace`.
#[derive(Debug, Default)]
pub struct LoggingScene {
    renderables: usize,
}

impl LoggingScene {
    /// Number of proxies currently alive, as far as this scene has been told.
    pub fn renderables(&self) -> usize {
        self.renderables
    }
}

impl SceneSurface for LoggingScene {
    fn add_renderable(&mut self, coordinate: Coordinate, style: VisualStyle) {
        self.renderables += 1;
        trace!(
            "add {:?} at {:?} color={:06x}",
            coordinate,
            proxy_center(coordinate),
            style.color
        );
    }

    fn remove_renderable(&mut self, coordinate: Coordinate) {
        self.renderables = self.renderables.saturating_sub(1);
        trace!("remove {:?}", coordinate);
    }

    fn set_highlight(&mut self, coordinate: Coordinate, variant: Option<HighlightStyle>) {
        trace!("highlight {:?} -> {:?}", coordinate, variant);
    }

    fn set_ghost(&mut self, coordinate: Option<Coordinate>, color: u32) {
        trace!("ghost {:?} color={:06x}", coordinate, color);
    }
}

/// A scene command as seen by [`RecordingScene`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneCommand {
    /// `add_renderable`
    Add(Coordinate, VisualStyle),
    /// `remove_renderable`
    Remove(Coordinate),
    /// `set_highlight`
    Highlight(Coordinate, Option<HighlightStyle>),
    /// `set_ghost`
    Ghost(Option<Coordinate>, u32),
}

/// Scene that appends every command to a shared log.
///
/// Clone the handle returned by [`RecordingScene::log`] before handing the
/// scene to the world, then drain it from the outside.
#[derive(Clone, Default)]
pub struct RecordingScene {
    log: StResource<Vec<SceneCommand>>,
}

impl RecordingScene {
    /// Creates a scene with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the command log.
    pub fn log(&self) -> StResource<Vec<SceneCommand>> {
        self.log.clone()
    }

    /// Removes and returns every recorded command.
    pub fn drain(&self) -> Vec<SceneCommand> {
        std::mem::take(&mut *self.log.get_mut())
    }
}

impl SceneSurface for RecordingScene {
    fn add_renderable(&mut self, coordinate: Coordinate, style: VisualStyle) {
        self.log.get_mut().push(SceneCommand::Add(coordinate, style));
    }

    fn remove_renderable(&mut self, coordinate: Coordinate) {
        self.log.get_mut().push(SceneCommand::Remove(coordinate));
    }

    fn set_highlight(&mut self, coordinate: Coordinate, variant: Option<HighlightStyle>) {
        self.log
            .get_mut()
            .push(SceneCommand::Highlight(coordinate, variant));
    }

    fn set_ghost(&mut self, coordinate: Option<Coordinate>, color: u32) {
        self.log.get_mut().push(SceneCommand::Ghost(coordinate, color));
    }
}
