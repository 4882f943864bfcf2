#![forbid(unsafe_code)]

//! The page controller.
//!
//! [`PageApp`] owns all mutable page state (rating, widgets, timers) and
//! reacts to [`Msg`] values pushed by the host. It is Elm-shaped: the host
//! translates DOM events into messages, calls [`PageApp::update`], and
//! periodically calls [`PageApp::tick`] with the current monotonic time so
//! scheduled work can fire.
//!
//! # Feedback flow
//!
//! ```text
//! Closed ──open──▶ Open ──modal submit ok──▶ Submitting ──auto-close──▶ Closed
//!    ▲               │                            │
//!    └────close──────┴──────────close─────────────┘
//! ```
//!
//! Opening the modal cancels a pending auto-close, so a close scheduled by an
//! earlier submission cannot shut a freshly reopened modal.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use terreiro_core::{
    DeterministicClock, ElementCache, FormFields, FormSource, OutboundLink, PageConfig,
    Testimonial, UiElement, validate_testimonial,
};
use terreiro_widgets::{
    CopyButton, FloatingTrigger, NavMenu, StarGroup, ToastId, ToastKind, ToastStack,
    anchor_target,
};
use tracing::{debug, info, trace, warn};

use crate::host::{ClipboardError, PageHost};
use crate::scheduler::{Scheduler, TimerKey};

/// Modal lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
    /// A modal submission succeeded; waiting for auto-close.
    Submitting,
}

/// Inputs to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    FloatingTriggerClicked,
    /// A feedback link, optionally naming a service to preselect.
    FeedbackLinkClicked { service: Option<String> },
    CloseClicked,
    /// A click whose target is the modal backdrop itself.
    ModalBackdropClicked,
    FormSubmitted {
        source: FormSource,
        fields: FormFields,
        submitted_at: DateTime<FixedOffset>,
    },
    StarClicked { group: usize, index: usize },
    StarHovered { group: usize, index: usize },
    StarsLeft { group: usize },
    NavToggleClicked,
    NavLinkClicked,
    AnchorClicked { href: String },
    CopyRequested,
    ClipboardWritten(Result<(), ClipboardError>),
    /// Show an arbitrary toast (legacy page-script entry point).
    Notify { message: String, kind: ToastKind },
}

/// Page controller state.
#[derive(Debug)]
pub struct PageApp {
    config: PageConfig,
    cache: ElementCache,
    rating: u8,
    groups: Vec<StarGroup>,
    modal: ModalState,
    toasts: ToastStack,
    copy_button: CopyButton,
    nav: NavMenu,
    floating: FloatingTrigger,
    scheduler: Scheduler,
    clock: DeterministicClock,
    dispatches: u64,
    initialized: bool,
}

impl PageApp {
    #[must_use]
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            cache: ElementCache::default(),
            rating: 0,
            groups: Vec::new(),
            modal: ModalState::Closed,
            toasts: ToastStack::new(),
            copy_button: CopyButton::new(),
            nav: NavMenu::new(),
            floating: FloatingTrigger::new(),
            scheduler: Scheduler::new(),
            clock: DeterministicClock::new(),
            dispatches: 0,
            initialized: false,
        }
    }

    /// Probe the page once and arm startup timers. Later calls are no-ops.
    pub fn init<H: PageHost>(&mut self, host: &mut H) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        self.cache = ElementCache::probe(|el| host.has_element(el), host.star_groups());
        for missing in self.cache.missing() {
            debug!(element = %missing, "page element absent; feature disabled");
        }
        self.groups = self
            .cache
            .star_groups()
            .iter()
            .map(|len| StarGroup::new(*len))
            .collect();

        if self.cache.has(UiElement::FloatingTrigger) {
            let now = self.clock.now();
            let timings = &self.config.timings;
            self.scheduler
                .schedule_once(TimerKey::FloatingReveal, now, timings.floating_reveal());
            self.scheduler
                .schedule_every(TimerKey::Pulse, now, timings.pulse_interval());
        }
        info!(
            star_groups = self.groups.len(),
            missing = self.cache.missing().count(),
            "page controller initialized"
        );
    }

    /// Advance the clock to `now` and run every timer that came due.
    ///
    /// Timers run in deadline order with the clock parked at their own
    /// deadline, so follow-up timers they schedule are measured from when
    /// they were due, not from when the host got around to ticking.
    pub fn tick<H: PageHost>(&mut self, now: Duration, host: &mut H) {
        while let Some(deadline) = self.scheduler.next_deadline().filter(|d| *d <= now) {
            self.clock.set(deadline);
            while let Some(key) = self.scheduler.pop_due(deadline) {
                self.fire(key, host);
            }
        }
        self.clock.set(now);
    }

    /// Handle one message.
    pub fn update<H: PageHost>(&mut self, msg: Msg, host: &mut H) {
        trace!(?msg, "update");
        match msg {
            Msg::FloatingTriggerClicked => self.open_modal(host),
            Msg::FeedbackLinkClicked { service } => {
                self.open_modal(host);
                if let Some(service) = service.filter(|s| !s.is_empty()) {
                    if self.cache.has(UiElement::ModalForm) {
                        host.select_service(&service);
                    }
                }
            }
            Msg::CloseClicked | Msg::ModalBackdropClicked => self.close_modal(host),
            Msg::FormSubmitted {
                source,
                fields,
                submitted_at,
            } => self.submit(source, &fields, submitted_at, host),
            Msg::StarClicked { group, index } => self.click_star(group, index, host),
            Msg::StarHovered { group, index } => {
                if let Some(stars) = self.groups.get_mut(group) {
                    stars.hover(index);
                    host.render_stars(group, stars);
                }
            }
            Msg::StarsLeft { group } => {
                if let Some(stars) = self.groups.get_mut(group) {
                    stars.leave(self.rating);
                    host.render_stars(group, stars);
                }
            }
            Msg::NavToggleClicked => {
                if self.nav_enabled() {
                    let open = self.nav.toggle();
                    host.set_nav_open(open);
                }
            }
            Msg::NavLinkClicked => {
                if self.nav_enabled() {
                    self.nav.close();
                    host.set_nav_open(false);
                }
            }
            Msg::AnchorClicked { href } => {
                if let Some(id) = anchor_target(&href) {
                    if !host.scroll_into_view(id) {
                        trace!(target_id = id, "anchor target not found");
                    }
                }
            }
            Msg::CopyRequested => self.copy_pix_key(host),
            Msg::ClipboardWritten(result) => self.clipboard_written(result, host),
            Msg::Notify { message, kind } => {
                self.present(message, kind, host);
            }
        }
    }

    /// Show a toast and schedule its dismissal.
    pub fn present<H: PageHost>(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        host: &mut H,
    ) -> ToastId {
        let now = self.clock.now();
        let toast = self.toasts.push(message, kind, now);
        let id = toast.id;
        host.mount_toast(toast);
        self.scheduler.schedule_once(
            TimerKey::ToastExit(id),
            now,
            self.config.timings.toast_timeout(),
        );
        id
    }

    // --- Feedback modal ---------------------------------------------------

    fn open_modal<H: PageHost>(&mut self, host: &mut H) {
        if !self.cache.has(UiElement::Modal) {
            debug!("open requested but modal is absent");
            return;
        }
        if self.scheduler.cancel(TimerKey::AutoClose) {
            debug!("pending auto-close canceled by reopen");
        }
        self.modal = ModalState::Open;
        host.set_modal_visible(true);
        host.set_scroll_locked(true);
        let message = self.config.messages.modal_opened.clone();
        self.present(message, ToastKind::Success, host);
        debug!("feedback modal opened");
    }

    fn close_modal<H: PageHost>(&mut self, host: &mut H) {
        if !self.cache.has(UiElement::Modal) {
            return;
        }
        self.scheduler.cancel(TimerKey::AutoClose);
        self.modal = ModalState::Closed;
        host.set_modal_visible(false);
        host.set_scroll_locked(false);
        self.reset_forms(host);
        debug!("feedback modal closed");
    }

    /// Clear the rating, every star group, and both forms.
    fn reset_forms<H: PageHost>(&mut self, host: &mut H) {
        self.rating = 0;
        for (idx, group) in self.groups.iter_mut().enumerate() {
            group.clear();
            host.render_stars(idx, group);
        }
        for source in [FormSource::Modal, FormSource::Inline] {
            if self.cache.has(source.element()) {
                host.reset_form(source);
            }
        }
    }

    fn submit<H: PageHost>(
        &mut self,
        source: FormSource,
        fields: &FormFields,
        submitted_at: DateTime<FixedOffset>,
        host: &mut H,
    ) {
        let testimonial =
            Testimonial::extract(fields, self.rating, submitted_at, &self.config.messages);
        if let Err(err) = validate_testimonial(&testimonial).into_result() {
            debug!(code = err.code, ?source, "testimonial rejected");
            let warning = self.config.messages.validation_warning.clone();
            self.present(warning, ToastKind::Warning, host);
            return;
        }

        let link = OutboundLink::for_testimonial(&self.config.whatsapp.phone_number, &testimonial);
        host.open_outbound(link.as_str());
        info!(?source, rating = testimonial.rating, "testimonial dispatched");

        // One confirmation per dispatch; they never replace each other.
        self.dispatches += 1;
        let now = self.clock.now();
        self.scheduler.schedule_once(
            TimerKey::OutboundConfirm(self.dispatches),
            now,
            self.config.timings.outbound_confirm(),
        );

        let pool = &self.config.messages.success;
        if !pool.is_empty() {
            let idx = host.random_index(pool.len()).min(pool.len() - 1);
            let message = pool[idx].clone();
            self.present(message, ToastKind::Success, host);
        }

        match source {
            FormSource::Modal => {
                if self.modal != ModalState::Closed {
                    self.modal = ModalState::Submitting;
                }
                self.scheduler.schedule_once(
                    TimerKey::AutoClose,
                    now,
                    self.config.timings.auto_close(),
                );
            }
            FormSource::Inline => self.reset_forms(host),
        }
    }

    // --- Stars ------------------------------------------------------------

    fn click_star<H: PageHost>(&mut self, group: usize, index: usize, host: &mut H) {
        let Some(stars) = self.groups.get_mut(group) else {
            return;
        };
        let Some(rating) = stars.click(index) else {
            return;
        };
        self.rating = rating;
        host.render_stars(group, stars);
        debug!(group, rating, "rating selected");
        if let Some(blessing) = self.config.messages.blessing(rating) {
            let blessing = blessing.to_string();
            self.present(blessing, ToastKind::Success, host);
        }
    }

    // --- Navigation & clipboard -------------------------------------------

    fn nav_enabled(&self) -> bool {
        self.cache
            .has_all(&[UiElement::NavToggle, UiElement::NavMenu])
    }

    fn copy_pix_key<H: PageHost>(&mut self, host: &mut H) {
        if !self
            .cache
            .has_all(&[UiElement::PixKey, UiElement::CopyButton])
        {
            debug!("copy requested but donation key elements are absent");
            return;
        }
        match host.element_text(UiElement::PixKey) {
            Some(text) => host.write_clipboard(&text),
            None => warn!("donation key element has no text"),
        }
    }

    fn clipboard_written<H: PageHost>(
        &mut self,
        result: Result<(), ClipboardError>,
        host: &mut H,
    ) {
        match result {
            Ok(()) => {
                let message = self.config.messages.copy_succeeded.clone();
                self.present(message, ToastKind::Success, host);
                let current = host.copy_button_label().unwrap_or_default();
                let face = self
                    .copy_button
                    .show_copied(current, &self.config.messages.copied_label);
                host.set_copy_button(&face);
                self.scheduler.schedule_once(
                    TimerKey::CopyRestore,
                    self.clock.now(),
                    self.config.timings.copy_restore(),
                );
            }
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                let message = self.config.messages.copy_failed.clone();
                self.present(message, ToastKind::Warning, host);
            }
        }
    }

    // --- Timers -----------------------------------------------------------

    fn fire<H: PageHost>(&mut self, key: TimerKey, host: &mut H) {
        let now = self.clock.now();
        match key {
            TimerKey::FloatingReveal => {
                if self.floating.reveal() {
                    host.reveal_floating_trigger();
                }
            }
            TimerKey::Pulse => {
                self.floating.stop_pulse();
                host.set_floating_pulse(false);
                self.scheduler.schedule_once(
                    TimerKey::PulseRestart,
                    now,
                    self.config.timings.pulse_restart(),
                );
            }
            TimerKey::PulseRestart => {
                self.floating.start_pulse();
                host.set_floating_pulse(true);
            }
            TimerKey::AutoClose => self.close_modal(host),
            TimerKey::OutboundConfirm(_) => {
                let message = self.config.messages.outbound_confirmed.clone();
                self.present(message, ToastKind::Success, host);
            }
            TimerKey::CopyRestore => {
                if let Some(face) = self.copy_button.restore() {
                    host.set_copy_button(&face);
                }
            }
            TimerKey::ToastExit(id) => {
                if self.toasts.begin_exit(id) {
                    host.begin_toast_exit(id);
                    self.scheduler.schedule_once(
                        TimerKey::ToastRemove(id),
                        now,
                        self.config.timings.toast_exit(),
                    );
                }
            }
            TimerKey::ToastRemove(id) => {
                if self.toasts.remove(id).is_some() {
                    host.remove_toast(id);
                }
            }
        }
    }

    // --- Accessors --------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn elements(&self) -> &ElementCache {
        &self.cache
    }

    /// Current shared rating, `0` when none is selected.
    #[must_use]
    pub fn rating(&self) -> u8 {
        self.rating
    }

    #[must_use]
    pub fn modal_state(&self) -> ModalState {
        self.modal
    }

    #[must_use]
    pub fn star_group(&self, group: usize) -> Option<&StarGroup> {
        self.groups.get(group)
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    #[must_use]
    pub fn nav(&self) -> NavMenu {
        self.nav
    }

    #[must_use]
    pub fn floating(&self) -> FloatingTrigger {
        self.floating
    }

    #[must_use]
    pub fn copy_button(&self) -> &CopyButton {
        &self.copy_button
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::{HostCall, PageSimulator, RecordingHost};
    use chrono::TimeZone;

    fn at() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 17, 14, 3, 9)
            .unwrap()
    }

    fn sim() -> PageSimulator {
        let mut sim = PageSimulator::new(PageConfig::default(), RecordingHost::full_page(vec![5]));
        sim.init();
        sim
    }

    #[test]
    fn init_is_idempotent() {
        let mut sim = sim();
        let scheduled = sim.app().scheduler().len();
        sim.init();
        assert_eq!(sim.app().scheduler().len(), scheduled);
    }

    #[test]
    fn open_shows_modal_and_locks_scroll() {
        let mut sim = sim();
        sim.send(Msg::FloatingTriggerClicked);
        assert_eq!(sim.app().modal_state(), ModalState::Open);
        assert!(sim.host().modal_visible);
        assert!(sim.host().scroll_locked);
        assert_eq!(sim.app().toasts().len(), 1);
    }

    #[test]
    fn feedback_link_selects_service() {
        let mut sim = sim();
        sim.send(Msg::FeedbackLinkClicked {
            service: Some("Jogo de Búzios".into()),
        });
        assert_eq!(sim.host().selected_service.as_deref(), Some("Jogo de Búzios"));
    }

    #[test]
    fn feedback_link_without_service_selects_nothing() {
        let mut sim = sim();
        sim.send(Msg::FeedbackLinkClicked {
            service: Some(String::new()),
        });
        assert!(sim.host().selected_service.is_none());
        assert_eq!(sim.app().modal_state(), ModalState::Open);
    }

    #[test]
    fn missing_modal_disables_open() {
        let host = RecordingHost::full_page(vec![5]).without(UiElement::Modal);
        let mut sim = PageSimulator::new(PageConfig::default(), host);
        sim.init();
        sim.send(Msg::FloatingTriggerClicked);
        assert_eq!(sim.app().modal_state(), ModalState::Closed);
        assert!(!sim.host().calls.contains(&HostCall::SetModalVisible(true)));
    }

    #[test]
    fn invalid_submission_warns_without_reset() {
        let mut sim = sim();
        sim.send(Msg::StarClicked { group: 0, index: 3 });
        sim.send(Msg::FormSubmitted {
            source: FormSource::Inline,
            fields: FormFields::new().with("testimonial-message", ""),
            submitted_at: at(),
        });
        assert_eq!(sim.app().rating(), 4);
        assert!(sim.host().opened_urls.is_empty());
        let last = sim.app().toasts().iter().last().unwrap();
        assert_eq!(last.kind, ToastKind::Warning);
        assert!(!sim.host().calls.contains(&HostCall::ResetForm(FormSource::Inline)));
    }

    #[test]
    fn star_click_shows_blessing() {
        let mut sim = sim();
        sim.send(Msg::StarClicked { group: 0, index: 1 });
        let last = sim.app().toasts().iter().last().unwrap();
        assert_eq!(last.message, "Agradecemos sua sinceridade, irmão! ✨");
    }

    #[test]
    fn unknown_star_group_is_ignored() {
        let mut sim = sim();
        sim.send(Msg::StarClicked { group: 3, index: 1 });
        sim.send(Msg::StarHovered { group: 3, index: 1 });
        sim.send(Msg::StarsLeft { group: 3 });
        assert_eq!(sim.app().rating(), 0);
        assert!(sim.app().toasts().is_empty());
    }

    #[test]
    fn notify_presents_toast() {
        let mut sim = sim();
        sim.send(Msg::Notify {
            message: "Axé".into(),
            kind: ToastKind::Warning,
        });
        assert_eq!(sim.host().mounted_toasts().count(), 1);
    }
}
