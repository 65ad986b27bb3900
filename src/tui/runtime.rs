//! Explorer state driven by the key bindings.

use tracing::warn;

use crate::loader::{LoadMethod, SampleNetwork};
use crate::network::ComponentKind;
use crate::session::Session;
use crate::shape::color::CarrierPalette;
use crate::shape::timeseries::{Selection, ShapeMode};
use crate::views::{View, ViewOutput, ViewRequest, dispatch};

/// TUI application state.
pub struct App {
    session: Option<Session>,
    palette: CarrierPalette,
    /// Last load failure or status line.
    pub message: Option<String>,
    /// Index into [`View::ALL`].
    pub view_idx: usize,
    /// Index into the current view's component menu.
    pub component_idx: usize,
    /// Index into the current kind's attribute menu.
    pub attribute_idx: usize,
    /// Index into the current kind's mode menu.
    pub mode_idx: usize,
    /// Cursor into the temporal entity list.
    pub entity_idx: usize,
    /// Entities chosen for plotting; `None` plots the first one.
    pub selection: Option<Vec<String>>,
    /// First text line shown in scrollable panels.
    pub scroll: u16,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Creates the app and loads `method` when given.
    pub fn new(method: Option<&LoadMethod>, palette: CarrierPalette) -> Self {
        let mut app = Self {
            session: None,
            palette,
            message: None,
            view_idx: 0,
            component_idx: 0,
            attribute_idx: 0,
            mode_idx: 0,
            entity_idx: 0,
            selection: None,
            scroll: 0,
            quit: false,
        };
        if let Some(method) = method {
            app.load(method);
        }
        app
    }

    /// Loads a network. On failure the previous session, if any, stays.
    pub fn load(&mut self, method: &LoadMethod) {
        match Session::open(method, self.palette.clone()) {
            Ok(session) => {
                self.message = Some(format!("loaded {}", session.source()));
                self.session = Some(session);
                self.component_idx = 0;
                self.reset_series_controls();
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                self.message = Some(format!("error: {e}"));
            }
        }
    }

    /// Loads the n-th bundled sample (0-based).
    pub fn load_sample(&mut self, n: usize) {
        if let Some(sample) = SampleNetwork::ALL.get(n) {
            self.load(&LoadMethod::Sample(*sample));
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn view(&self) -> View {
        View::ALL[self.view_idx % View::ALL.len()]
    }

    /// The selected component kind, when the view has a component menu.
    pub fn component(&self) -> Option<ComponentKind> {
        let menu = self.view().component_menu();
        (!menu.is_empty()).then(|| menu[self.component_idx % menu.len()])
    }

    pub fn attribute(&self) -> Option<&'static str> {
        let attributes = self.component()?.series_attributes();
        (!attributes.is_empty()).then(|| attributes[self.attribute_idx % attributes.len()])
    }

    pub fn mode(&self) -> Option<ShapeMode> {
        let modes = self.component()?.series_modes();
        (!modes.is_empty()).then(|| modes[self.mode_idx % modes.len()])
    }

    /// The request matching the current controls.
    pub fn request(&self) -> ViewRequest {
        let mut request = ViewRequest::new(self.view());
        request.component = self.component();
        if self.view() == View::Temporal {
            request.attribute = self.attribute().map(str::to_string);
            request.mode = self.mode();
            request.selection = match &self.selection {
                Some(entities) => Selection::Entities(entities.clone()),
                None => Selection::FirstAvailable,
            };
        }
        request
    }

    /// Output of the current view, `None` before the first successful load.
    pub fn output(&self) -> Option<ViewOutput<'_>> {
        self.session
            .as_ref()
            .map(|session| dispatch(session, &self.request()))
    }

    /// Entities of the current temporal series, in column order.
    pub fn entities(&self) -> Vec<String> {
        match self.output() {
            Some(ViewOutput::Temporal(view)) => view.entities,
            _ => Vec::new(),
        }
    }

    /// Entity under the cursor.
    pub fn cursor_entity(&self) -> Option<String> {
        let entities = self.entities();
        let len = entities.len();
        entities.into_iter().nth(self.entity_idx % len.max(1))
    }

    /// Whether `entity` is plotted by the current selection.
    pub fn is_selected(&self, entity: &str, entities: &[String]) -> bool {
        match &self.selection {
            Some(chosen) => chosen.iter().any(|e| e == entity),
            None => entities.first().is_some_and(|e| e == entity),
        }
    }

    pub fn next_entity(&mut self) {
        let len = self.entities().len();
        if len > 0 {
            self.entity_idx = (self.entity_idx + 1) % len;
        }
    }

    pub fn prev_entity(&mut self) {
        let len = self.entities().len();
        if len > 0 {
            self.entity_idx = (self.entity_idx % len + len - 1) % len;
        }
    }

    /// Adds or removes the entity under the cursor. Removing the last one
    /// leaves an empty selection.
    pub fn toggle_entity(&mut self) {
        let entities = self.entities();
        let Some(entity) = entities.get(self.entity_idx % entities.len().max(1)).cloned() else {
            return;
        };
        let mut chosen = self
            .selection
            .take()
            .unwrap_or_else(|| entities.iter().take(1).cloned().collect());
        if let Some(pos) = chosen.iter().position(|e| *e == entity) {
            chosen.remove(pos);
        } else {
            chosen.push(entity);
        }
        chosen.sort_by_key(|e| entities.iter().position(|x| x == e));
        self.selection = Some(chosen);
    }

    /// Returns to plotting the first entity.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn next_view(&mut self) {
        self.view_idx = (self.view_idx + 1) % View::ALL.len();
        self.component_idx = 0;
        self.reset_series_controls();
    }

    pub fn prev_view(&mut self) {
        self.view_idx = (self.view_idx + View::ALL.len() - 1) % View::ALL.len();
        self.component_idx = 0;
        self.reset_series_controls();
    }

    pub fn next_component(&mut self) {
        let len = self.view().component_menu().len();
        if len > 0 {
            self.component_idx = (self.component_idx + 1) % len;
            self.reset_series_controls();
        }
    }

    pub fn prev_component(&mut self) {
        let len = self.view().component_menu().len();
        if len > 0 {
            self.component_idx = (self.component_idx + len - 1) % len;
            self.reset_series_controls();
        }
    }

    pub fn next_attribute(&mut self) {
        let len = self.component().map_or(0, |k| k.series_attributes().len());
        if len > 0 {
            self.attribute_idx = (self.attribute_idx + 1) % len;
            self.reset_selection();
        }
    }

    pub fn next_mode(&mut self) {
        let len = self.component().map_or(0, |k| k.series_modes().len());
        if len > 0 {
            self.mode_idx = (self.mode_idx + 1) % len;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn reset_series_controls(&mut self) {
        self.attribute_idx = 0;
        self.mode_idx = 0;
        self.scroll = 0;
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.entity_idx = 0;
        self.selection = None;
    }
}
