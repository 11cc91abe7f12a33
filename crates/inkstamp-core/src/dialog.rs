//! The add-signature dialog controller.
//!
//! `SignatureDialog` owns one [`CaptureSession`] per open/close cycle. Input
//! reaches a tab only through bindings registered for the current tab
//! activation; switching tabs, clearing, or closing renews the listener scope,
//! which also invalidates any [`ImageJob`] or [`DescriptionLookup`] still in
//! flight.

use crate::capture::image::{accept_file, drop_effect};
use crate::capture::{
    CaptureError, CaptureSession, DragItem, DrawCapture, DropEffect, Focus, ImageCapture,
    ImageJob, ImageOutcome, PointerSample, Tab, TabCapture,
};
use crate::config::SignatureConfig;
use crate::host::{Collaborators, ImageFile, Localizer, SignatureHost};
use crate::launcher::LauncherEntry;
use crate::outline::{SignatureData, TextStyle};
use crate::overlay::{DialogHandle, OverlayError};
use crate::scope::{AbortToken, Binding, InputKind, ListenerScope};
use crate::storage::StoredSignature;
use kurbo::{BezPath, Size};
use std::rc::Rc;

/// Lifecycle of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open(Tab),
}

/// What a commit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub tab: Tab,
    pub description: String,
    /// Store id, when the signature was saved.
    pub uuid: Option<String>,
}

/// Pending lookup of the default description for a drawing.
pub struct DescriptionLookup {
    token: AbortToken,
    key: String,
    localizer: Rc<dyn Localizer>,
}

/// Resolved [`DescriptionLookup`].
#[derive(Debug)]
pub struct ResolvedDescription {
    token: AbortToken,
    pub text: String,
}

impl DescriptionLookup {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn run(self) -> ResolvedDescription {
        let text = self.localizer.get(&self.key).await;
        ResolvedDescription {
            token: self.token,
            text,
        }
    }
}

fn inputs_for(tab: Tab) -> &'static [InputKind] {
    match tab {
        Tab::Type => &[InputKind::TypeInput],
        Tab::Draw => &[InputKind::Pointer, InputKind::Thickness],
        Tab::Image => &[InputKind::FilePicker, InputKind::Drop],
    }
}

/// Start a new listener epoch and bind the tab's inputs to it.
fn bind_inputs(scope: &mut ListenerScope, tab: Tab) -> Vec<Binding> {
    let token = scope.renew();
    log::debug!("Binding {} tab inputs (epoch {})", tab, token.epoch());
    inputs_for(tab)
        .iter()
        .map(|&input| Binding::new(input, token.clone()))
        .collect()
}

/// Controller of the add-signature dialog.
pub struct SignatureDialog {
    config: SignatureConfig,
    collab: Collaborators,
    session: Option<CaptureSession>,
    scope: ListenerScope,
    bindings: Vec<Binding>,
    /// Live size of the drawing surface.
    draw_surface: Size,
    /// Computed style of the type tab's input.
    type_style: TextStyle,
}

impl SignatureDialog {
    pub fn new(config: SignatureConfig, collab: Collaborators) -> Self {
        Self {
            config,
            collab,
            session: None,
            scope: ListenerScope::new(),
            bindings: Vec::new(),
            draw_surface: Size::ZERO,
            type_style: TextStyle::default(),
        }
    }

    pub fn config(&self) -> &SignatureConfig {
        &self.config
    }

    /// Open the dialog for `host`, starting on the type tab.
    pub async fn open(&mut self, host: Rc<dyn SignatureHost>) -> Result<(), OverlayError> {
        self.collab.overlay.open(DialogHandle::Signature)?;
        let storage_full = match self.collab.store.is_full().await {
            Ok(full) => full,
            Err(e) => {
                log::warn!("Could not query signature store capacity: {}", e);
                false
            }
        };
        if storage_full {
            log::info!("Signature store is full, saving unchecked by default");
        }
        self.session = Some(CaptureSession::new(
            host,
            storage_full,
            self.config.default_thickness,
        ));
        self.select_tab(Tab::Type);
        Ok(())
    }

    pub fn state(&self) -> DialogState {
        match self.session.as_ref().and_then(|s| s.active) {
            Some(tab) => DialogState::Open(tab),
            None => DialogState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.session.as_ref().and_then(|s| s.active)
    }

    pub fn focus(&self) -> Option<Focus> {
        self.session.as_ref().and_then(|s| s.focus)
    }

    /// Whether input of this kind currently reaches the dialog.
    pub fn is_bound(&self, input: InputKind) -> bool {
        self.bindings.iter().any(|b| b.input == input && b.is_live())
    }

    /// Switch to `tab`, swapping the description snapshot and input bindings.
    pub fn select_tab(&mut self, tab: Tab) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.active == Some(tab) {
            return;
        }
        if let Some(current) = session.active {
            session
                .descriptions
                .insert(current, session.description.clone());
        }
        session.active = Some(tab);
        session.description = session.descriptions.get(&tab).cloned().unwrap_or_default();
        session.focus = Some(Focus::from(tab));
        session.waiting = false;
        self.bindings = bind_inputs(&mut self.scope, tab);
    }

    /// Reset the active tab's capture and its description.
    pub fn clear_signature(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(tab) = session.active else {
            return;
        };
        session.reset_capture(tab);
        session.description.clear();
        session.descriptions.remove(&tab);
        session.waiting = false;
        if tab == Tab::Type {
            session.description_dirty = false;
        }
        self.bindings = bind_inputs(&mut self.scope, tab);
    }

    /// Whether the active tab holds something to commit.
    pub fn can_commit(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(CaptureSession::active_is_capturable)
    }

    // Description field

    pub fn description(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.description.as_str())
    }

    pub fn can_clear_description(&self) -> bool {
        !self.description().is_empty()
    }

    /// The user edited the description field.
    pub fn set_description(&mut self, text: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.description = text.to_string();
        session.description_dirty = session.typed_text() != session.description;
    }

    /// Empty the description field. Mirroring state is left alone.
    pub fn clear_description(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.description.clear();
        }
    }

    // Save checkbox

    pub fn save_preferred(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.save_preferred)
    }

    pub fn set_save_preferred(&mut self, save: bool) {
        if let Some(session) = self.session.as_mut() {
            session.save_preferred = save;
        }
    }

    /// The save control is flagged because the store was full at open.
    pub fn is_storage_full(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.storage_full)
    }

    // Type tab

    pub fn typed_text(&self) -> &str {
        self.session.as_ref().map_or("", CaptureSession::typed_text)
    }

    pub fn set_type_style(&mut self, style: TextStyle) {
        self.type_style = style;
    }

    /// The type tab's text changed.
    pub fn set_typed_text(&mut self, text: &str) {
        if !self.is_bound(InputKind::TypeInput) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(typed) = session.typed_text_mut() {
            *typed = text.to_string();
        }
        if !session.description_dirty {
            session.description = text.to_string();
        }
    }

    // Draw tab

    pub fn set_draw_surface(&mut self, size: Size) {
        self.draw_surface = size;
    }

    pub fn draw_surface(&self) -> Size {
        self.draw_surface
    }

    pub fn drawing(&self) -> Option<&DrawCapture> {
        self.session.as_ref().and_then(CaptureSession::draw)
    }

    /// Running path of the draw tab.
    pub fn drawn_path(&self) -> Option<&BezPath> {
        self.drawing().map(DrawCapture::path)
    }

    pub fn thickness(&self) -> f64 {
        self.session
            .as_ref()
            .map_or(self.config.default_thickness, |s| s.thickness)
    }

    /// Change the stroke thickness. Returns the value actually applied.
    pub fn set_thickness(&mut self, thickness: f64) -> f64 {
        let thickness = self.config.clamp_thickness(thickness);
        if !self.is_bound(InputKind::Thickness) {
            return self.thickness();
        }
        if let Some(session) = self.session.as_mut() {
            session.thickness = thickness;
            if let Some(Some(draw)) = session.draw_slot() {
                draw.thickness = thickness;
            }
        }
        thickness
    }

    /// Pointer pressed on the drawing surface.
    ///
    /// The first stroke of an empty drawing returns a lookup for the default
    /// description when the description is still empty.
    pub fn pointer_down(&mut self, sample: PointerSample) -> Option<DescriptionLookup> {
        if !self.is_bound(InputKind::Pointer) {
            return None;
        }
        let session = self.session.as_mut()?;
        let thickness = session.thickness;
        let slot = session.draw_slot()?;
        let first_stroke = slot.is_none();
        if !slot
            .get_or_insert_with(|| DrawCapture::new(thickness))
            .begin_stroke(sample)
        {
            return None;
        }
        if !first_stroke || !session.description.is_empty() {
            return None;
        }
        Some(DescriptionLookup {
            token: self.scope.token(),
            key: self.config.draw_description_key.clone(),
            localizer: Rc::clone(&self.collab.localizer),
        })
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> bool {
        if !self.is_bound(InputKind::Pointer) {
            return false;
        }
        let surface = self.draw_surface;
        match self.session.as_mut().and_then(|s| s.draw_slot()) {
            Some(Some(draw)) => draw.extend_stroke(sample, surface),
            _ => false,
        }
    }

    /// Pointer released. Returns true if a stroke was completed.
    pub fn pointer_up(&mut self, pointer_id: i64) -> bool {
        if !self.is_bound(InputKind::Pointer) {
            return false;
        }
        match self.session.as_mut().and_then(|s| s.draw_slot()) {
            Some(Some(draw)) => draw.end_stroke(pointer_id).is_some(),
            _ => false,
        }
    }

    /// Fill the description from a resolved lookup if it is still empty.
    pub fn apply_default_description(&mut self, resolved: ResolvedDescription) {
        if resolved.token.is_aborted() {
            log::debug!("Dropping default description from a previous tab activation");
            return;
        }
        if let Some(session) = self.session.as_mut() {
            if session.description.is_empty() {
                session.description = resolved.text;
            }
        }
    }

    /// Run a lookup and apply it.
    pub async fn fill_default_description(&mut self, lookup: DescriptionLookup) {
        let resolved = lookup.run().await;
        self.apply_default_description(resolved);
    }

    // Image tab

    pub fn image(&self) -> Option<&ImageCapture> {
        self.session.as_ref().and_then(CaptureSession::image)
    }

    pub fn is_waiting(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.waiting)
    }

    /// Inline error banner.
    pub fn error(&self) -> Option<&CaptureError> {
        self.session.as_ref().and_then(|s| s.error.as_ref())
    }

    pub fn dismiss_error(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.error = None;
        }
    }

    pub fn drag_over(&self, items: &[DragItem], copy_allowed: bool) -> DropEffect {
        if !self.is_bound(InputKind::Drop) {
            return DropEffect::None;
        }
        drop_effect(&self.config, items, copy_allowed)
    }

    /// Files selected with the picker.
    pub fn choose_file(&mut self, files: Vec<ImageFile>) -> Option<ImageJob> {
        if !self.is_bound(InputKind::FilePicker) {
            return None;
        }
        self.start_image(files)
    }

    /// Files dropped on the image tab.
    pub fn drop_files(&mut self, files: Vec<ImageFile>) -> Option<ImageJob> {
        if !self.is_bound(InputKind::Drop) {
            return None;
        }
        self.start_image(files)
    }

    fn start_image(&mut self, files: Vec<ImageFile>) -> Option<ImageJob> {
        let session = self.session.as_mut()?;
        match accept_file(&self.config, files) {
            Ok(file) => {
                log::debug!("Tracing {} ({})", file.name, file.media_type);
                session.waiting = true;
                Some(ImageJob {
                    token: self.scope.token(),
                    file,
                    host: Rc::clone(&session.host),
                    decoder: Rc::clone(&self.collab.decoder),
                })
            }
            Err(e) => {
                log::warn!("Rejected image input: {}", e);
                session.error = Some(e);
                None
            }
        }
    }

    /// Apply a finished [`ImageJob`]. Outcomes from a torn-down tab
    /// activation are ignored.
    pub fn apply_image(&mut self, outcome: ImageOutcome) {
        if outcome.token.is_aborted() {
            log::debug!(
                "Dropping traced image {} from a previous tab activation",
                outcome.file_name
            );
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.waiting = false;
        match outcome.result {
            Err(e) => {
                log::error!("{}", e);
                session.error = Some(CaptureError::Decode(e));
            }
            Ok(None) => {
                log::debug!("Nothing traceable in {}", outcome.file_name);
            }
            Ok(Some(data)) => {
                if session.description.is_empty() {
                    session.description = outcome.file_name.clone();
                }
                session.set_image(ImageCapture {
                    data,
                    file_name: outcome.file_name,
                });
            }
        }
    }

    /// Pick, decode, trace and apply in one go.
    pub async fn load_image(&mut self, files: Vec<ImageFile>) {
        if let Some(job) = self.choose_file(files) {
            let outcome = job.run().await;
            self.apply_image(outcome);
        }
    }

    // Commit

    /// Hand the active tab's signature to the host, saving it first if asked.
    ///
    /// Returns `None` when nothing is committable. Always closes the dialog
    /// otherwise.
    pub async fn commit(&mut self) -> Option<CommitOutcome> {
        let session = self.session.as_ref()?;
        let tab = session.active?;
        if !session.active_is_capturable() {
            return None;
        }
        let host = Rc::clone(&session.host);
        let description = session.description.clone();
        let save = session.save_preferred;

        let data = match session.capture(tab) {
            TabCapture::Type(text) => {
                let text = text.clone();
                host.outlines().from_text(&text, &self.type_style).await
            }
            TabCapture::Draw(draw) => {
                let curves = draw.as_ref()?.drawn_curves();
                host.outlines()
                    .from_drawn_curves(&curves, self.draw_surface)
                    .await
            }
            TabCapture::Image(image) => image.as_ref()?.data.clone(),
        };

        let uuid = if save {
            self.persist(&data, &description).await
        } else {
            None
        };
        log::info!(
            "Committing {} signature{}",
            tab,
            if uuid.is_some() { " (saved)" } else { "" }
        );
        host.add_signature(data, self.config.default_height, &description, uuid.as_deref());
        self.close(false, true);

        Some(CommitOutcome {
            tab,
            description,
            uuid,
        })
    }

    async fn persist(&self, data: &SignatureData, description: &str) -> Option<String> {
        let signature_data = match self.collab.codec.compress(&data.record).await {
            Ok(compressed) => compressed,
            Err(e) => {
                log::error!("Failed to compress signature: {}", e);
                return None;
            }
        };
        let record = StoredSignature {
            description: description.to_string(),
            signature_data,
        };
        match self.collab.store.create(record).await {
            Ok(uuid) if !uuid.is_empty() => {
                log::info!("Stored signature {}", uuid);
                self.collab.launcher.borrow_mut().push(LauncherEntry {
                    uuid: uuid.clone(),
                    description: description.to_string(),
                    outline: data.outline.clone(),
                });
                Some(uuid)
            }
            Ok(_) => {
                log::error!("Signature store returned no id");
                None
            }
            Err(e) => {
                log::error!("Failed to store signature: {}", e);
                None
            }
        }
    }

    /// Close without committing.
    pub fn cancel(&mut self) {
        self.close(true, true);
    }

    /// The overlay closed the dialog on its own.
    pub fn abort(&mut self) {
        self.close(true, false);
    }

    fn close(&mut self, discard: bool, close_overlay: bool) {
        self.scope.renew();
        self.bindings.clear();
        if let Some(session) = self.session.take() {
            if discard {
                session.host.discard();
            }
        }
        if close_overlay {
            if let Err(e) = self.collab.overlay.close(DialogHandle::Signature) {
                log::warn!("{}", e);
            }
        }
    }
}
