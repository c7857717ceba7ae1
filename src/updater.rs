//! Refresh driver for every placed widget.
//!
//! A refresh reads the session and host metrics fresh, then renders, plans
//! and submits each instance on its own. One instance failing does not stop
//! the rest; the next refresh is the retry.

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    cover::{
        CoverResolver, CoverSettings, DecodingLoader, ImageLoader, MonogramPlaceholder,
        PlaceholderRenderer,
    },
    dimension::resolve_size,
    host::{DisplayInfo, Orientation, WidgetHost, WidgetId},
    intent::{DefaultIntents, IntentFactory},
    layout::{plan_visibility, LayoutMetrics},
    render::StateRenderer,
    session::{SessionSnapshot, SessionStore},
    view::ViewState,
};

/// What one `refresh_all` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub instances: usize,
    pub updated: usize,
    pub failed: usize,
    /// Instances whose size was known, so the visibility planner ran.
    pub planned: usize,
}

pub struct WidgetUpdater<'a> {
    store: &'a dyn SessionStore,
    host: &'a dyn WidgetHost,
    display: &'a dyn DisplayInfo,
    config: &'a Config,
    intents: &'a dyn IntentFactory,
    loader: &'a dyn ImageLoader,
    placeholder: &'a dyn PlaceholderRenderer,
}

impl<'a> WidgetUpdater<'a> {
    pub fn new(
        store: &'a dyn SessionStore,
        host: &'a dyn WidgetHost,
        display: &'a dyn DisplayInfo,
        config: &'a Config,
    ) -> Self {
        Self {
            store,
            host,
            display,
            config,
            intents: &DefaultIntents,
            loader: &DecodingLoader,
            placeholder: &MonogramPlaceholder,
        }
    }

    pub fn with_intents(mut self, intents: &'a dyn IntentFactory) -> Self {
        self.intents = intents;
        self
    }

    pub fn with_image_loader(mut self, loader: &'a dyn ImageLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'a dyn PlaceholderRenderer) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn refresh_all(&self) -> RefreshReport {
        let ids = self.host.list_instance_ids();
        let mut report = RefreshReport {
            instances: ids.len(),
            ..RefreshReport::default()
        };
        if ids.is_empty() {
            debug!(target: "widget::updater", "No widget instances placed");
            return report;
        }

        let snapshot = self.store.current_snapshot();
        let orientation = self.display.orientation();
        info!(
            target: "widget::updater",
            instances = ids.len(),
            item = snapshot.as_ref().map(|s| s.name.as_str()).unwrap_or("<none>"),
            ?orientation,
            "Refreshing widgets"
        );

        let metrics = LayoutMetrics::from_config(&self.config.layout, self.display);
        let covers = CoverResolver::new(
            self.loader,
            self.placeholder,
            CoverSettings::from_config(&self.config.cover, self.display),
        );
        let renderer = StateRenderer::new(covers, self.intents);

        for id in ids {
            let view = match &snapshot {
                Some(item) => {
                    let view = self.render_instance(id, item, orientation, &metrics, &renderer);
                    if view.layout().is_some() {
                        report.planned += 1;
                    }
                    view
                }
                None => renderer.render_no_session(),
            };

            match self.host.submit(id, view) {
                Ok(()) => report.updated += 1,
                Err(err) => {
                    warn!(target: "widget::updater", widget = %id, error = %err, "Failed to update widget");
                    report.failed += 1;
                }
            }
        }

        debug!(target: "widget::updater", ?report, "Refresh finished");
        report
    }

    fn render_instance(
        &self,
        id: WidgetId,
        item: &SessionSnapshot,
        orientation: Orientation,
        metrics: &LayoutMetrics,
        renderer: &StateRenderer<'_>,
    ) -> ViewState {
        let hints = self.host.size_hints(id).unwrap_or_default();
        let size = resolve_size(hints, orientation, self.display);

        let mut view = renderer.render_session(item, size.height);

        if size.is_known() {
            let plan = plan_visibility(size, item.is_single_section(), metrics);
            debug!(
                target: "widget::updater",
                widget = %id,
                width = size.width,
                height = size.height,
                hidden = ?plan.hidden(),
                "Planned widget layout"
            );
            view.apply_layout(&plan);
        } else {
            debug!(target: "widget::updater", widget = %id, "No usable size hints; keeping default layout");
        }

        view
    }
}
