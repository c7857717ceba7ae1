//! File-backed stand-ins for the session store and the widget host.
//!
//! A scenario TOML file describes the display, the current session and the
//! placed widgets. The preview host writes every submitted view into an
//! output directory: the cover as PNG and a plain-text summary.

use std::{
    cell::RefCell,
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
};

use anyhow::{anyhow, Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::HostError,
    host::{
        Density, DisplayInfo, OrientationSignal, SizeHints, UnitConverter, WidgetHost, WidgetId,
    },
    intent::Intent,
    session::{ItemId, PlaybackPhase, SessionSnapshot, SessionStore},
    view::{ElementId, ImageContent, ViewState},
};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub display: DisplaySection,
    pub session: Option<SessionSnapshot>,
    pub widgets: Vec<WidgetSection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub density: f32,
    pub orientation: OrientationSignal,
    pub width: u32,
    pub height: u32,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            density: 1.0,
            orientation: OrientationSignal::Undefined,
            width: 1080,
            height: 1920,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSection {
    pub id: WidgetId,
    #[serde(flatten)]
    pub hints: SizeHints,
}

#[derive(Debug, Deserialize)]
struct ScenarioDocument {
    #[serde(default)]
    display: DisplaySection,
    session: Option<SessionSection>,
    #[serde(default)]
    widgets: Vec<WidgetSection>,
}

#[derive(Debug, Deserialize)]
struct SessionSection {
    id: ItemId,
    name: String,
    #[serde(default)]
    section: String,
    #[serde(default = "default_section_count")]
    sections: usize,
    #[serde(default)]
    cover: PathBuf,
    #[serde(default)]
    phase: PlaybackPhase,
    #[serde(default)]
    use_cover_replacement: bool,
}

fn default_section_count() -> usize {
    1
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&data, base)
            .with_context(|| format!("Failed to parse scenario: {}", path.display()))
    }

    /// Relative cover paths are resolved against `base`.
    pub fn from_toml_str(data: &str, base: &Path) -> Result<Self> {
        let doc: ScenarioDocument = toml::from_str(data)?;

        if !(doc.display.density.is_finite() && doc.display.density > 0.0) {
            return Err(anyhow!(
                "display.density must be positive, got {}",
                doc.display.density
            ));
        }

        let session = doc.session.map(|section| SessionSnapshot {
            id: section.id,
            name: section.name,
            section_name: section.section,
            section_count: section.sections,
            cover_file: if section.cover.is_relative() {
                base.join(section.cover)
            } else {
                section.cover
            },
            use_cover_replacement: section.use_cover_replacement,
            phase: section.phase,
        });

        Ok(Scenario {
            display: doc.display,
            session,
            widgets: doc.widgets,
        })
    }
}

impl SessionStore for Scenario {
    fn current_session_id(&self) -> Option<ItemId> {
        self.session.as_ref().map(|s| s.id)
    }

    fn snapshot_by_id(&self, id: ItemId) -> Option<SessionSnapshot> {
        self.session.as_ref().filter(|s| s.id == id).cloned()
    }
}

impl UnitConverter for Scenario {
    fn to_pixels(&self, dp: f32) -> u32 {
        Density(self.display.density).to_pixels(dp)
    }
}

impl DisplayInfo for Scenario {
    fn orientation_signal(&self) -> OrientationSignal {
        self.display.orientation
    }

    fn display_size(&self) -> (u32, u32) {
        (self.display.width, self.display.height)
    }
}

/// Host that writes submitted views to disk and remembers them.
pub struct PreviewHost {
    out_dir: PathBuf,
    widgets: Vec<WidgetSection>,
    submitted: RefCell<Vec<(WidgetId, ViewState)>>,
}

impl PreviewHost {
    pub fn new(out_dir: impl Into<PathBuf>, widgets: Vec<WidgetSection>) -> Self {
        Self {
            out_dir: out_dir.into(),
            widgets,
            submitted: RefCell::new(Vec::new()),
        }
    }

    pub fn submitted(&self) -> Vec<(WidgetId, ViewState)> {
        self.submitted.borrow().clone()
    }

    fn write_preview(&self, id: WidgetId, view: &ViewState) -> Result<(), HostError> {
        let io_error = |source| HostError::Io { id, source };
        fs::create_dir_all(&self.out_dir).map_err(io_error)?;

        let png = self.out_dir.join(format!("widget-{}.png", id.0));
        match view.image(ElementId::Cover) {
            Some(ImageContent::Bitmap(cover)) => cover
                .image
                .save(&png)
                .map_err(|source| HostError::Encode { id, source })?,
            // A cover from an earlier refresh must not outlive it.
            _ => match fs::remove_file(&png) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(io_error(err)),
                _ => {}
            },
        }

        let path = self.out_dir.join(format!("widget-{}.txt", id.0));
        fs::write(&path, describe(view)).map_err(io_error)?;
        info!(target: "widget::preview", widget = %id, path = %path.display(), "Wrote widget preview");
        Ok(())
    }
}

impl WidgetHost for PreviewHost {
    fn list_instance_ids(&self) -> Vec<WidgetId> {
        self.widgets.iter().map(|w| w.id).collect()
    }

    fn size_hints(&self, id: WidgetId) -> Option<SizeHints> {
        self.widgets.iter().find(|w| w.id == id).map(|w| w.hints)
    }

    fn submit(&self, id: WidgetId, view: ViewState) -> Result<(), HostError> {
        if !self.widgets.iter().any(|w| w.id == id) {
            return Err(HostError::InstanceGone(id));
        }
        self.write_preview(id, &view)?;
        self.submitted.borrow_mut().push((id, view));
        Ok(())
    }
}

const DESCRIBED_ELEMENTS: [ElementId; 7] = [
    ElementId::WholeWidget,
    ElementId::Cover,
    ElementId::Title,
    ElementId::Subtitle,
    ElementId::Rewind,
    ElementId::PlayPause,
    ElementId::FastForward,
];

/// Plain-text rendering of a view, one element per line.
pub fn describe(view: &ViewState) -> String {
    let mut out = String::new();
    if let Some(plan) = view.layout() {
        let size = plan.size();
        let _ = writeln!(
            out,
            "layout: {}x{} hidden={:?}",
            size.width,
            size.height,
            plan.hidden()
        );
    } else {
        let _ = writeln!(out, "layout: default");
    }

    for element in DESCRIBED_ELEMENTS {
        let mut line = format!(
            "{element:?}: {}",
            if view.is_visible(element) { "visible" } else { "hidden" }
        );
        if let Some(text) = view.text(element) {
            let _ = write!(line, " text={text:?}");
        }
        match view.image(element) {
            Some(ImageContent::Bitmap(cover)) => {
                let _ = write!(line, " image={}px {:?}", cover.size(), cover.source);
            }
            Some(ImageContent::Resource(icon)) => {
                let _ = write!(line, " icon={icon:?}");
            }
            None => {}
        }
        match view.click_target(element) {
            Some(Intent::Transport(command)) => {
                let _ = write!(line, " click={command:?} key={}", command.key_code());
            }
            Some(intent) => {
                let _ = write!(line, " click={intent:?}");
            }
            None => {}
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Watches the scenario file's directory for edits to the scenario.
pub struct ScenarioWatcher {
    target: PathBuf,
    _watcher: RecommendedWatcher,
    changes_rx: Receiver<notify::Result<notify::Event>>,
}

impl ScenarioWatcher {
    pub fn new(scenario: &Path) -> Result<Self> {
        let target = fs::canonicalize(scenario)
            .with_context(|| format!("Scenario {} does not exist", scenario.display()))?;
        let dir = target
            .parent()
            .ok_or_else(|| anyhow!("Scenario {} has no parent directory", target.display()))?
            .to_path_buf();

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        // Editors often replace the file, so watch the directory.
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            target,
            _watcher: watcher,
            changes_rx: rx,
        })
    }

    /// Blocks until the scenario changes. Returns `false` once the watcher
    /// has shut down.
    pub fn wait_for_change(&self) -> bool {
        loop {
            let Ok(event) = self.changes_rx.recv() else {
                return false;
            };
            let mut relevant = self.is_relevant(event);
            while let Ok(event) = self.changes_rx.try_recv() {
                relevant |= self.is_relevant(event);
            }
            if relevant {
                return true;
            }
        }
    }

    fn is_relevant(&self, event: notify::Result<notify::Event>) -> bool {
        match event {
            Ok(evt) => {
                (evt.kind.is_modify() || evt.kind.is_create())
                    && evt.paths.iter().any(|p| p.file_name() == self.target.file_name())
            }
            Err(err) => {
                warn!(target: "widget::preview", error = %err, "Scenario watcher error");
                false
            }
        }
    }
}
