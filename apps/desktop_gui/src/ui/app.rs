//! The dashboard shell: sidebar navigation, six tab surfaces, edit dialogs,
//! and delete confirmations. All store work happens on the backend worker;
//! this layer renders the latest controller snapshots and queues commands.

use chrono::NaiveDate;
use client_core::{
    CourseDraft, CoursesSnapshot, EditorState, EnrollmentDraft, EnrollmentsSnapshot,
    InstructorDraft, InstructorsSnapshot, OverviewSnapshot, ParticipantDraft,
    ParticipantsSnapshot, RoomDraft, RoomsSnapshot,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::{CourseStatus, RecordId};

use crate::backend_bridge::commands::{BackendCommand, EntityTab};
use crate::controller::events::{err_label, UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const SETTINGS_STORAGE_KEY: &str = "kursmanager_ui_settings";

mod palette {
    use egui::Color32;

    pub const APP_BG: Color32 = Color32::from_rgb(249, 247, 243);
    pub const SIDEBAR_BG: Color32 = Color32::from_rgb(22, 24, 50);
    pub const SIDEBAR_TEXT: Color32 = Color32::from_rgb(160, 163, 196);
    pub const SIDEBAR_MUTED: Color32 = Color32::from_rgb(104, 108, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(62, 70, 201);
    pub const PRIMARY_SOFT: Color32 = Color32::from_rgb(233, 234, 247);
    pub const CARD_BG: Color32 = Color32::WHITE;
    pub const CARD_BORDER: Color32 = Color32::from_rgb(221, 222, 232);
    pub const TEXT: Color32 = Color32::from_rgb(38, 40, 64);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(110, 112, 135);
    pub const DESTRUCTIVE: Color32 = Color32::from_rgb(214, 55, 55);
    pub const DESTRUCTIVE_SOFT: Color32 = Color32::from_rgb(252, 226, 226);
    pub const SUCCESS: Color32 = Color32::from_rgb(30, 113, 94);
    pub const SUCCESS_SOFT: Color32 = Color32::from_rgb(219, 240, 233);
    pub const GRAY_SOFT: Color32 = Color32::from_rgb(232, 233, 240);
    pub const ERROR_BG: Color32 = Color32::from_rgb(111, 53, 53);
    pub const ERROR_BORDER: Color32 = Color32::from_rgb(175, 96, 96);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Uebersicht,
    Kurse,
    Dozenten,
    Teilnehmer,
    Raeume,
    Anmeldungen,
}

impl Tab {
    const NAV: [Tab; 6] = [
        Tab::Uebersicht,
        Tab::Kurse,
        Tab::Dozenten,
        Tab::Teilnehmer,
        Tab::Raeume,
        Tab::Anmeldungen,
    ];

    fn label(self) -> &'static str {
        match self {
            Tab::Uebersicht => "Übersicht",
            Tab::Kurse => "Kurse",
            Tab::Dozenten => "Dozenten",
            Tab::Teilnehmer => "Teilnehmer",
            Tab::Raeume => "Räume",
            Tab::Anmeldungen => "Anmeldungen",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Tab::Uebersicht => "▦",
            Tab::Kurse => "📖",
            Tab::Dozenten => "🎓",
            Tab::Teilnehmer => "👥",
            Tab::Raeume => "🚪",
            Tab::Anmeldungen => "📋",
        }
    }

    fn entity(self) -> Option<EntityTab> {
        match self {
            Tab::Uebersicht => None,
            Tab::Kurse => Some(EntityTab::Courses),
            Tab::Dozenten => Some(EntityTab::Instructors),
            Tab::Teilnehmer => Some(EntityTab::Participants),
            Tab::Raeume => Some(EntityTab::Rooms),
            Tab::Anmeldungen => Some(EntityTab::Enrollments),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedUiSettings {
    active_tab: Option<Tab>,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    title: &'static str,
    message: String,
}

/// True when a snapshot opens an editor the UI has not adopted yet; the local
/// form is reseeded exactly once per opened editor so typing is never
/// clobbered by later snapshots.
fn editor_newly_opened<D: PartialEq>(
    previous: &Option<EditorState<D>>,
    next: &Option<EditorState<D>>,
) -> bool {
    match (previous, next) {
        (None, Some(_)) => true,
        (Some(a), Some(b)) => a.target != b.target,
        _ => false,
    }
}

fn format_date_de(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn status_badge_colors(status: CourseStatus) -> (egui::Color32, egui::Color32) {
    match status {
        CourseStatus::Planned => (palette::PRIMARY_SOFT, palette::PRIMARY),
        CourseStatus::Active => (palette::SUCCESS_SOFT, palette::SUCCESS),
        CourseStatus::Completed => (palette::GRAY_SOFT, palette::TEXT_MUTED),
        CourseStatus::Cancelled => (palette::DESTRUCTIVE_SOFT, palette::DESTRUCTIVE),
    }
}

enum RowAction {
    Edit(RecordId),
    Delete(RecordId),
}

enum ConfirmAction {
    Cancel,
    Confirm,
}

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    active_tab: Tab,
    bootstrapped: bool,

    overview: OverviewSnapshot,
    instructors: InstructorsSnapshot,
    rooms: RoomsSnapshot,
    participants: ParticipantsSnapshot,
    courses: CoursesSnapshot,
    enrollments: EnrollmentsSnapshot,

    instructor_form: InstructorDraft,
    room_form: RoomDraft,
    participant_form: ParticipantDraft,
    course_form: CourseDraft,
    enrollment_form: EnrollmentDraft,

    status: String,
    status_banner: Option<StatusBanner>,
}

impl DashboardApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedUiSettingsHandle>,
    ) -> Self {
        let active_tab = persisted
            .and_then(|p| p.0.active_tab)
            .unwrap_or(Tab::Uebersicht);
        Self {
            cmd_tx,
            ui_rx,
            active_tab,
            bootstrapped: false,
            overview: OverviewSnapshot::default(),
            instructors: InstructorsSnapshot::default(),
            rooms: RoomsSnapshot::default(),
            participants: ParticipantsSnapshot::default(),
            courses: CoursesSnapshot::default(),
            enrollments: EnrollmentsSnapshot::default(),
            instructor_form: InstructorDraft::default(),
            room_form: RoomDraft::default(),
            participant_form: ParticipantDraft::default(),
            course_form: CourseDraft::default(),
            enrollment_form: EnrollmentDraft::default(),
            status: "Verbinde mit Datenspeicher...".to_string(),
            status_banner: None,
        }
    }

    pub fn restore(storage: Option<&dyn eframe::Storage>) -> Option<PersistedUiSettingsHandle> {
        storage
            .and_then(|storage| storage.get_string(SETTINGS_STORAGE_KEY))
            .and_then(|text| serde_json::from_str::<PersistedUiSettings>(&text).ok())
            .map(PersistedUiSettingsHandle)
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn reload_active_tab(&mut self) {
        let cmd = match self.active_tab.entity() {
            Some(entity) => BackendCommand::Load(entity),
            None => BackendCommand::LoadOverview,
        };
        self.dispatch(cmd);
    }

    fn select_tab(&mut self, tab: Tab) {
        if self.active_tab == tab {
            return;
        }
        // Leaving a tab tears its dialogs down, like the original view
        // unmount. The worker still owns the controller state; the next
        // activation reloads it from scratch.
        if let Some(entity) = self.active_tab.entity() {
            if self.active_editor_open() {
                self.dispatch(BackendCommand::CloseEditor(entity));
            }
            if self.active_pending_delete() {
                self.dispatch(BackendCommand::CancelDelete(entity));
            }
        }
        self.active_tab = tab;
        // Every activation is a full reload; snapshots for the tab we just
        // left are dropped in process_ui_events.
        self.reload_active_tab();
    }

    fn active_editor_open(&self) -> bool {
        match self.active_tab {
            Tab::Uebersicht => false,
            Tab::Kurse => self.courses.editor.is_some(),
            Tab::Dozenten => self.instructors.editor.is_some(),
            Tab::Teilnehmer => self.participants.editor.is_some(),
            Tab::Raeume => self.rooms.editor.is_some(),
            Tab::Anmeldungen => self.enrollments.editor.is_some(),
        }
    }

    fn active_pending_delete(&self) -> bool {
        match self.active_tab {
            Tab::Uebersicht => false,
            Tab::Kurse => self.courses.pending_delete.is_some(),
            Tab::Dozenten => self.instructors.pending_delete.is_some(),
            Tab::Teilnehmer => self.participants.pending_delete.is_some(),
            Tab::Raeume => self.rooms.pending_delete.is_some(),
            Tab::Anmeldungen => self.enrollments.pending_delete.is_some(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(error) => {
                    self.apply_error(error);
                }
                UiEvent::Overview(snapshot) => {
                    if self.active_tab == Tab::Uebersicht {
                        self.overview = snapshot;
                    }
                }
                UiEvent::Instructors(snapshot) => {
                    if self.active_tab != Tab::Dozenten {
                        continue;
                    }
                    if editor_newly_opened(&self.instructors.editor, &snapshot.editor) {
                        self.instructor_form = snapshot
                            .editor
                            .as_ref()
                            .map(|e| e.draft.clone())
                            .unwrap_or_default();
                    }
                    self.instructors = snapshot;
                }
                UiEvent::Rooms(snapshot) => {
                    if self.active_tab != Tab::Raeume {
                        continue;
                    }
                    if editor_newly_opened(&self.rooms.editor, &snapshot.editor) {
                        self.room_form = snapshot
                            .editor
                            .as_ref()
                            .map(|e| e.draft.clone())
                            .unwrap_or_default();
                    }
                    self.rooms = snapshot;
                }
                UiEvent::Participants(snapshot) => {
                    if self.active_tab != Tab::Teilnehmer {
                        continue;
                    }
                    if editor_newly_opened(&self.participants.editor, &snapshot.editor) {
                        self.participant_form = snapshot
                            .editor
                            .as_ref()
                            .map(|e| e.draft.clone())
                            .unwrap_or_default();
                    }
                    self.participants = snapshot;
                }
                UiEvent::Courses(snapshot) => {
                    if self.active_tab != Tab::Kurse {
                        continue;
                    }
                    if editor_newly_opened(&self.courses.editor, &snapshot.editor) {
                        self.course_form = snapshot
                            .editor
                            .as_ref()
                            .map(|e| e.draft.clone())
                            .unwrap_or_default();
                    }
                    self.courses = snapshot;
                }
                UiEvent::Enrollments(snapshot) => {
                    if self.active_tab != Tab::Anmeldungen {
                        continue;
                    }
                    if editor_newly_opened(&self.enrollments.editor, &snapshot.editor) {
                        self.enrollment_form = snapshot
                            .editor
                            .as_ref()
                            .map(|e| e.draft.clone())
                            .unwrap_or_default();
                    }
                    self.enrollments = snapshot;
                }
            }
        }
    }

    fn apply_error(&mut self, error: UiError) {
        tracing::warn!(
            category = ?error.category(),
            context = ?error.context(),
            "surfacing backend failure in status banner"
        );
        self.status = error.message().to_string();
        self.status_banner = Some(StatusBanner {
            title: err_label(error.category()),
            message: error.message().to_string(),
        });
    }

    fn show_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("dashboard_navigation")
            .exact_width(230.0)
            .resizable(false)
            .frame(
                egui::Frame::NONE
                    .fill(palette::SIDEBAR_BG)
                    .inner_margin(egui::Margin::symmetric(14, 18)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    egui::Frame::NONE
                        .fill(palette::PRIMARY)
                        .corner_radius(egui::CornerRadius::same(8))
                        .inner_margin(egui::Margin::symmetric(8, 6))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new("📖").size(16.0));
                        });
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new("Kursmanager")
                                .strong()
                                .color(egui::Color32::WHITE),
                        );
                        ui.label(
                            egui::RichText::new("Verwaltungssystem")
                                .small()
                                .color(palette::SIDEBAR_MUTED),
                        );
                    });
                });

                ui.add_space(18.0);
                ui.label(
                    egui::RichText::new("NAVIGATION")
                        .small()
                        .color(palette::SIDEBAR_MUTED),
                );
                ui.add_space(6.0);

                let mut selected = None;
                for tab in Tab::NAV {
                    let active = self.active_tab == tab;
                    let fill = if active {
                        palette::PRIMARY.gamma_multiply(0.35)
                    } else {
                        egui::Color32::TRANSPARENT
                    };
                    let text_color = if active {
                        egui::Color32::WHITE
                    } else {
                        palette::SIDEBAR_TEXT
                    };
                    let button = egui::Button::new(
                        egui::RichText::new(format!("{}  {}", tab.icon(), tab.label()))
                            .color(text_color),
                    )
                    .fill(fill)
                    .corner_radius(egui::CornerRadius::same(6))
                    .min_size(egui::vec2(ui.available_width(), 32.0));
                    if ui.add(button).clicked() {
                        selected = Some(tab);
                    }
                    ui.add_space(2.0);
                }
                if let Some(tab) = selected {
                    self.select_tab(tab);
                }

                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    ui.label(
                        egui::RichText::new("© 2026 Kursmanager")
                            .small()
                            .color(palette::SIDEBAR_MUTED),
                    );
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new(&self.status)
                            .small()
                            .color(palette::SIDEBAR_TEXT),
                    );
                });
            });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status_banner.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Frame::NONE
            .fill(palette::ERROR_BG)
            .stroke(egui::Stroke::new(1.0, palette::ERROR_BORDER))
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(banner.title)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            dismissed = true;
                        }
                    });
                });
            });
        ui.add_space(10.0);
        if dismissed {
            self.status_banner = None;
        }
    }

    fn tab_header(
        ui: &mut egui::Ui,
        title: &str,
        subtitle: &str,
        add_label: &str,
    ) -> bool {
        let mut add_clicked = false;
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new(title)
                        .size(22.0)
                        .strong()
                        .color(palette::TEXT),
                );
                ui.label(egui::RichText::new(subtitle).color(palette::TEXT_MUTED));
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let button = egui::Button::new(
                    egui::RichText::new(format!("+ {add_label}")).color(egui::Color32::WHITE),
                )
                .fill(palette::PRIMARY)
                .corner_radius(egui::CornerRadius::same(6))
                .min_size(egui::vec2(0.0, 30.0));
                if ui.add(button).clicked() {
                    add_clicked = true;
                }
            });
        });
        ui.add_space(14.0);
        add_clicked
    }

    fn loading_placeholder(ui: &mut egui::Ui) {
        ui.add_space(48.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("Laden...").color(palette::TEXT_MUTED));
        });
    }

    fn empty_state(ui: &mut egui::Ui, icon: &str, message: &str) {
        ui.add_space(48.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(icon).size(36.0).color(palette::TEXT_MUTED));
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(message)
                    .strong()
                    .color(palette::TEXT_MUTED),
            );
        });
    }

    fn card_frame() -> egui::Frame {
        egui::Frame::NONE
            .fill(palette::CARD_BG)
            .stroke(egui::Stroke::new(1.0, palette::CARD_BORDER))
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::symmetric(14, 12))
    }

    fn badge(ui: &mut egui::Ui, text: &str, fill: egui::Color32, color: egui::Color32) {
        egui::Frame::NONE
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::symmetric(8, 2))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(text).small().color(color));
            });
    }

    fn row_actions(ui: &mut egui::Ui, id: &RecordId) -> Option<RowAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            if ui.small_button("✏").on_hover_text("Bearbeiten").clicked() {
                action = Some(RowAction::Edit(id.clone()));
            }
            if ui
                .small_button(egui::RichText::new("🗑").color(palette::DESTRUCTIVE))
                .on_hover_text("Löschen")
                .clicked()
            {
                action = Some(RowAction::Delete(id.clone()));
            }
        });
        action
    }

    fn stat_card(
        ui: &mut egui::Ui,
        width: f32,
        icon: &str,
        label: &str,
        value: &str,
        sub: &str,
        accent: bool,
    ) {
        let (fill, stroke, text, muted) = if accent {
            (
                palette::PRIMARY,
                egui::Stroke::NONE,
                egui::Color32::WHITE,
                egui::Color32::from_rgb(213, 216, 245),
            )
        } else {
            (
                palette::CARD_BG,
                egui::Stroke::new(1.0, palette::CARD_BORDER),
                palette::TEXT,
                palette::TEXT_MUTED,
            )
        };
        egui::Frame::NONE
            .fill(fill)
            .stroke(stroke)
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.set_width(width);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(icon).size(20.0).color(text));
                    ui.add_space(4.0);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(label).small().color(muted));
                        ui.label(egui::RichText::new(value).size(24.0).strong().color(text));
                        if !sub.is_empty() {
                            ui.label(egui::RichText::new(sub).small().color(muted));
                        }
                    });
                });
            });
    }

    fn show_overview(&mut self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new("Willkommen zurück")
                .size(24.0)
                .strong()
                .color(palette::TEXT),
        );
        ui.label(
            egui::RichText::new("Hier ist Ihre aktuelle Übersicht des Kursverwaltungssystems.")
                .color(palette::TEXT_MUTED),
        );
        ui.add_space(18.0);

        if self.overview.loading {
            ui.vertical_centered(|ui| {
                ui.add_space(48.0);
                ui.label(
                    egui::RichText::new("Statistiken werden geladen...")
                        .color(palette::TEXT_MUTED),
                );
            });
            return;
        }
        let Some(stats) = self.overview.stats else {
            Self::empty_state(ui, "▦", "Noch keine Statistiken verfügbar");
            return;
        };

        let card_width = ((ui.available_width() - 24.0) / 3.0).max(180.0);
        ui.horizontal(|ui| {
            Self::stat_card(
                ui,
                card_width,
                "📋",
                "ANMELDUNGEN GESAMT",
                &stats.anmeldungen.to_string(),
                &stats.enrollment_sub_label(),
                true,
            );
            Self::stat_card(
                ui,
                card_width,
                "📖",
                "KURSE",
                &stats.kurse.to_string(),
                "Insgesamt angelegt",
                false,
            );
            Self::stat_card(
                ui,
                card_width,
                "👥",
                "TEILNEHMER",
                &stats.teilnehmer.to_string(),
                "Registriert",
                false,
            );
        });
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            Self::stat_card(
                ui,
                card_width,
                "🎓",
                "DOZENTEN",
                &stats.dozenten.to_string(),
                "Lehrpersonal",
                false,
            );
            Self::stat_card(
                ui,
                card_width,
                "🚪",
                "RÄUME",
                &stats.raeume.to_string(),
                "Verfügbar",
                false,
            );
            Self::stat_card(
                ui,
                card_width,
                "📋",
                "ZAHLUNGSQUOTE",
                &stats.payment_rate_label(),
                &stats.payment_sub_label(),
                false,
            );
        });

        ui.add_space(18.0);
        egui::Frame::NONE
            .fill(palette::SIDEBAR_BG)
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::symmetric(18, 14))
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new("SCHNELLSTART")
                        .small()
                        .color(palette::SIDEBAR_MUTED),
                );
                ui.label(
                    egui::RichText::new("Verwalten Sie Ihr Kursprogramm")
                        .size(16.0)
                        .strong()
                        .color(egui::Color32::WHITE),
                );
                ui.label(
                    egui::RichText::new(
                        "Legen Sie zunächst Ihre Dozenten und Räume an, erstellen Sie dann \
                         Kurse und nehmen Sie Anmeldungen entgegen. Alle Daten werden \
                         automatisch gespeichert.",
                    )
                    .color(palette::SIDEBAR_TEXT),
                );
            });
    }

    fn show_instructors(&mut self, ui: &mut egui::Ui) {
        let subtitle = format!("{} Einträge", self.instructors.items.len());
        if Self::tab_header(ui, "Dozenten", &subtitle, "Dozent hinzufügen") {
            self.dispatch(BackendCommand::OpenCreate(EntityTab::Instructors));
        }

        if self.instructors.loading {
            Self::loading_placeholder(ui);
            return;
        }
        if self.instructors.items.is_empty() {
            Self::empty_state(ui, "🎓", "Noch keine Dozenten eingetragen");
            return;
        }

        let mut action = None;
        Self::card_frame().show(ui, |ui| {
            egui::Grid::new("instructors_table")
                .num_columns(5)
                .spacing([18.0, 8.0])
                .striped(true)
                .min_col_width(90.0)
                .show(ui, |ui| {
                    for header in ["Name", "E-Mail", "Telefon", "Fachgebiet", ""] {
                        ui.label(
                            egui::RichText::new(header)
                                .strong()
                                .color(palette::TEXT_MUTED),
                        );
                    }
                    ui.end_row();

                    for record in &self.instructors.items {
                        ui.label(
                            egui::RichText::new(&record.fields.name)
                                .strong()
                                .color(palette::TEXT),
                        );
                        ui.label(record.fields.email.as_deref().unwrap_or("—"));
                        ui.label(record.fields.telefon.as_deref().unwrap_or("—"));
                        match &record.fields.fachgebiet {
                            Some(fachgebiet) => {
                                Self::badge(ui, fachgebiet, palette::PRIMARY_SOFT, palette::PRIMARY)
                            }
                            None => {
                                ui.label("—");
                            }
                        }
                        if let Some(row_action) = Self::row_actions(ui, &record.record_id) {
                            action = Some(row_action);
                        }
                        ui.end_row();
                    }
                });
        });

        match action {
            Some(RowAction::Edit(id)) => {
                self.dispatch(BackendCommand::OpenEdit(EntityTab::Instructors, id))
            }
            Some(RowAction::Delete(id)) => {
                self.dispatch(BackendCommand::RequestDelete(EntityTab::Instructors, id))
            }
            None => {}
        }
    }

    fn show_participants(&mut self, ui: &mut egui::Ui) {
        let subtitle = format!("{} Einträge", self.participants.items.len());
        if Self::tab_header(ui, "Teilnehmer", &subtitle, "Teilnehmer hinzufügen") {
            self.dispatch(BackendCommand::OpenCreate(EntityTab::Participants));
        }

        if self.participants.loading {
            Self::loading_placeholder(ui);
            return;
        }
        if self.participants.items.is_empty() {
            Self::empty_state(ui, "👥", "Noch keine Teilnehmer eingetragen");
            return;
        }

        let mut action = None;
        Self::card_frame().show(ui, |ui| {
            egui::Grid::new("participants_table")
                .num_columns(5)
                .spacing([18.0, 8.0])
                .striped(true)
                .min_col_width(90.0)
                .show(ui, |ui| {
                    for header in ["Name", "E-Mail", "Telefon", "Geburtsdatum", ""] {
                        ui.label(
                            egui::RichText::new(header)
                                .strong()
                                .color(palette::TEXT_MUTED),
                        );
                    }
                    ui.end_row();

                    for record in &self.participants.items {
                        ui.label(
                            egui::RichText::new(&record.fields.name)
                                .strong()
                                .color(palette::TEXT),
                        );
                        ui.label(record.fields.email.as_deref().unwrap_or("—"));
                        ui.label(record.fields.telefon.as_deref().unwrap_or("—"));
                        ui.label(
                            record
                                .fields
                                .geburtsdatum
                                .as_deref()
                                .map(format_date_de)
                                .unwrap_or_else(|| "—".to_string()),
                        );
                        if let Some(row_action) = Self::row_actions(ui, &record.record_id) {
                            action = Some(row_action);
                        }
                        ui.end_row();
                    }
                });
        });

        match action {
            Some(RowAction::Edit(id)) => {
                self.dispatch(BackendCommand::OpenEdit(EntityTab::Participants, id))
            }
            Some(RowAction::Delete(id)) => {
                self.dispatch(BackendCommand::RequestDelete(EntityTab::Participants, id))
            }
            None => {}
        }
    }

    fn show_rooms(&mut self, ui: &mut egui::Ui) {
        let subtitle = format!("{} Einträge", self.rooms.items.len());
        if Self::tab_header(ui, "Räume", &subtitle, "Raum hinzufügen") {
            self.dispatch(BackendCommand::OpenCreate(EntityTab::Rooms));
        }

        if self.rooms.loading {
            Self::loading_placeholder(ui);
            return;
        }
        if self.rooms.items.is_empty() {
            Self::empty_state(ui, "🚪", "Noch keine Räume eingetragen");
            return;
        }

        let mut action = None;
        let card_width = ((ui.available_width() - 24.0) / 3.0).max(180.0);
        for chunk in self.rooms.items.chunks(3) {
            ui.horizontal(|ui| {
                for record in chunk {
                    Self::card_frame().show(ui, |ui| {
                        ui.set_width(card_width);
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new("🚪").size(18.0));
                            ui.vertical(|ui| {
                                ui.label(
                                    egui::RichText::new(&record.fields.raumname)
                                        .strong()
                                        .color(palette::TEXT),
                                );
                                if let Some(gebaeude) = &record.fields.gebaeude {
                                    ui.label(
                                        egui::RichText::new(format!("🏢 {gebaeude}"))
                                            .small()
                                            .color(palette::TEXT_MUTED),
                                    );
                                }
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Min),
                                |ui| {
                                    if let Some(row_action) =
                                        Self::row_actions(ui, &record.record_id)
                                    {
                                        action = Some(row_action);
                                    }
                                },
                            );
                        });
                        if let Some(kapazitaet) = record.fields.kapazitaet {
                            ui.separator();
                            ui.horizontal(|ui| {
                                ui.label(
                                    egui::RichText::new("Kapazität:")
                                        .small()
                                        .color(palette::TEXT_MUTED),
                                );
                                ui.label(
                                    egui::RichText::new(format!("{kapazitaet} Plätze"))
                                        .strong()
                                        .color(palette::PRIMARY),
                                );
                            });
                        }
                    });
                }
            });
            ui.add_space(8.0);
        }

        match action {
            Some(RowAction::Edit(id)) => {
                self.dispatch(BackendCommand::OpenEdit(EntityTab::Rooms, id))
            }
            Some(RowAction::Delete(id)) => {
                self.dispatch(BackendCommand::RequestDelete(EntityTab::Rooms, id))
            }
            None => {}
        }
    }

    fn show_courses(&mut self, ui: &mut egui::Ui) {
        let subtitle = format!("{} Einträge", self.courses.items.len());
        if Self::tab_header(ui, "Kurse", &subtitle, "Kurs hinzufügen") {
            self.dispatch(BackendCommand::OpenCreate(EntityTab::Courses));
        }

        if self.courses.loading {
            Self::loading_placeholder(ui);
            return;
        }
        if self.courses.items.is_empty() {
            Self::empty_state(ui, "📖", "Noch keine Kurse eingetragen");
            return;
        }

        let mut action = None;
        let card_width = ((ui.available_width() - 16.0) / 2.0).max(260.0);
        for chunk in self.courses.items.chunks(2) {
            ui.horizontal(|ui| {
                for record in chunk {
                    Self::card_frame().show(ui, |ui| {
                        ui.set_width(card_width);
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(
                                    egui::RichText::new(&record.fields.titel)
                                        .size(15.0)
                                        .strong()
                                        .color(palette::TEXT),
                                );
                                if let Some(status) = record.fields.status {
                                    let (fill, color) = status_badge_colors(status);
                                    Self::badge(ui, status.label(), fill, color);
                                }
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Min),
                                |ui| {
                                    if let Some(row_action) =
                                        Self::row_actions(ui, &record.record_id)
                                    {
                                        action = Some(row_action);
                                    }
                                },
                            );
                        });

                        if let Some(beschreibung) = &record.fields.beschreibung {
                            ui.label(
                                egui::RichText::new(beschreibung)
                                    .small()
                                    .color(palette::TEXT_MUTED),
                            );
                        }
                        ui.add_space(4.0);

                        ui.horizontal_wrapped(|ui| {
                            if record.fields.startdatum.is_some()
                                || record.fields.enddatum.is_some()
                            {
                                let start = record
                                    .fields
                                    .startdatum
                                    .as_deref()
                                    .map(format_date_de)
                                    .unwrap_or_else(|| "?".to_string());
                                let range = match record.fields.enddatum.as_deref() {
                                    Some(end) => {
                                        format!("📅 {start} – {}", format_date_de(end))
                                    }
                                    None => format!("📅 {start}"),
                                };
                                ui.label(
                                    egui::RichText::new(range)
                                        .small()
                                        .color(palette::TEXT_MUTED),
                                );
                            }
                            if let Some(preis) = record.fields.preis {
                                ui.label(
                                    egui::RichText::new(format!("{preis:.2} €"))
                                        .small()
                                        .strong()
                                        .color(palette::PRIMARY),
                                );
                            }
                            if let Some(max) = record.fields.max_teilnehmer {
                                ui.label(
                                    egui::RichText::new(format!("Max. {max} Teilnehmer"))
                                        .small()
                                        .color(palette::TEXT_MUTED),
                                );
                            }
                        });

                        let dozent_name = self
                            .courses
                            .instructor_name(record.fields.dozent.as_ref())
                            .map(str::to_string);
                        let raum_name = self
                            .courses
                            .room_name(record.fields.raum.as_ref())
                            .map(str::to_string);
                        if dozent_name.is_some() || raum_name.is_some() {
                            ui.horizontal_wrapped(|ui| {
                                if let Some(name) = dozent_name {
                                    ui.label(
                                        egui::RichText::new(format!("🎓 {name}"))
                                            .small()
                                            .color(palette::TEXT_MUTED),
                                    );
                                }
                                if let Some(name) = raum_name {
                                    ui.label(
                                        egui::RichText::new(format!("Raum: {name}"))
                                            .small()
                                            .color(palette::TEXT_MUTED),
                                    );
                                }
                            });
                        }
                    });
                }
            });
            ui.add_space(8.0);
        }

        match action {
            Some(RowAction::Edit(id)) => {
                self.dispatch(BackendCommand::OpenEdit(EntityTab::Courses, id))
            }
            Some(RowAction::Delete(id)) => {
                self.dispatch(BackendCommand::RequestDelete(EntityTab::Courses, id))
            }
            None => {}
        }
    }

    fn show_enrollments(&mut self, ui: &mut egui::Ui) {
        let paid = self.enrollments.paid_count();
        let open = self.enrollments.open_count();
        let subtitle = format!("{paid} bezahlt · {open} offen");
        if Self::tab_header(ui, "Anmeldungen", &subtitle, "Anmeldung hinzufügen") {
            self.dispatch(BackendCommand::OpenCreate(EntityTab::Enrollments));
        }

        if self.enrollments.loading {
            Self::loading_placeholder(ui);
            return;
        }
        if self.enrollments.items.is_empty() {
            Self::empty_state(ui, "📋", "Noch keine Anmeldungen vorhanden");
            return;
        }

        let mut action = None;
        Self::card_frame().show(ui, |ui| {
            egui::Grid::new("enrollments_table")
                .num_columns(5)
                .spacing([18.0, 8.0])
                .striped(true)
                .min_col_width(90.0)
                .show(ui, |ui| {
                    for header in ["Teilnehmer", "Kurs", "Anmeldedatum", "Bezahlt", ""] {
                        ui.label(
                            egui::RichText::new(header)
                                .strong()
                                .color(palette::TEXT_MUTED),
                        );
                    }
                    ui.end_row();

                    for record in &self.enrollments.items {
                        let teilnehmer = self
                            .enrollments
                            .participant_name(record.fields.teilnehmer.as_ref())
                            .unwrap_or("—");
                        let kurs = self
                            .enrollments
                            .course_title(record.fields.kurs.as_ref())
                            .unwrap_or("—");
                        ui.label(
                            egui::RichText::new(teilnehmer)
                                .strong()
                                .color(palette::TEXT),
                        );
                        ui.label(egui::RichText::new(kurs).color(palette::TEXT));
                        ui.label(
                            record
                                .fields
                                .anmeldedatum
                                .as_deref()
                                .map(format_date_de)
                                .unwrap_or_else(|| "—".to_string()),
                        );
                        if record.fields.bezahlt {
                            Self::badge(ui, "✔ Bezahlt", palette::SUCCESS_SOFT, palette::SUCCESS);
                        } else {
                            Self::badge(ui, "✕ Offen", palette::GRAY_SOFT, palette::TEXT_MUTED);
                        }
                        if let Some(row_action) = Self::row_actions(ui, &record.record_id) {
                            action = Some(row_action);
                        }
                        ui.end_row();
                    }
                });
        });

        match action {
            Some(RowAction::Edit(id)) => {
                self.dispatch(BackendCommand::OpenEdit(EntityTab::Enrollments, id))
            }
            Some(RowAction::Delete(id)) => {
                self.dispatch(BackendCommand::RequestDelete(EntityTab::Enrollments, id))
            }
            None => {}
        }
    }

    fn dialog_frame(ctx: &egui::Context) -> egui::Frame {
        egui::Frame::NONE
            .fill(ctx.style().visuals.window_fill)
            .stroke(egui::Stroke::new(1.0, palette::CARD_BORDER))
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::symmetric(16, 14))
    }

    fn form_row(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
        ui.label(egui::RichText::new(label).color(palette::TEXT));
        ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(hint)
                .desired_width(260.0),
        );
        ui.end_row();
    }

    /// Cancel/save footer. Returns `(cancel, save)`.
    fn dialog_footer(ui: &mut egui::Ui, can_save: bool, saving: bool) -> (bool, bool) {
        let mut cancel = false;
        let mut save = false;
        ui.add_space(10.0);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if saving { "Speichern..." } else { "Speichern" };
            let button = egui::Button::new(egui::RichText::new(label).color(egui::Color32::WHITE))
                .fill(palette::PRIMARY)
                .corner_radius(egui::CornerRadius::same(6));
            if ui.add_enabled(can_save && !saving, button).clicked() {
                save = true;
            }
            if ui.button("Abbrechen").clicked() {
                cancel = true;
            }
        });
        (cancel, save)
    }

    fn show_instructor_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.instructors.editor.clone() else {
            return;
        };
        let title = if editor.target.is_some() {
            "Dozent bearbeiten"
        } else {
            "Neuer Dozent"
        };
        let mut cancel = false;
        let mut save = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .frame(Self::dialog_frame(ctx))
            .show(ctx, |ui| {
                egui::Grid::new("instructor_form")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        Self::form_row(
                            ui,
                            "Name *",
                            &mut self.instructor_form.name,
                            "Dr. Max Mustermann",
                        );
                        Self::form_row(
                            ui,
                            "E-Mail",
                            &mut self.instructor_form.email,
                            "max@beispiel.de",
                        );
                        Self::form_row(
                            ui,
                            "Telefon",
                            &mut self.instructor_form.telefon,
                            "+49 123 456789",
                        );
                        Self::form_row(
                            ui,
                            "Fachgebiet",
                            &mut self.instructor_form.fachgebiet,
                            "z.B. Informatik, Mathematik...",
                        );
                    });
                let (c, s) = Self::dialog_footer(
                    ui,
                    self.instructor_form.is_valid(),
                    self.instructors.saving,
                );
                cancel = c;
                save = s;
            });
        if cancel {
            self.dispatch(BackendCommand::CloseEditor(EntityTab::Instructors));
        }
        if save {
            let draft = self.instructor_form.clone();
            self.dispatch(BackendCommand::SaveInstructor(draft));
        }
    }

    fn show_room_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.rooms.editor.clone() else {
            return;
        };
        let title = if editor.target.is_some() {
            "Raum bearbeiten"
        } else {
            "Neuer Raum"
        };
        let mut cancel = false;
        let mut save = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .frame(Self::dialog_frame(ctx))
            .show(ctx, |ui| {
                egui::Grid::new("room_form")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        Self::form_row(
                            ui,
                            "Raumname *",
                            &mut self.room_form.raumname,
                            "z.B. Raum A101",
                        );
                        Self::form_row(
                            ui,
                            "Gebäude",
                            &mut self.room_form.gebaeude,
                            "z.B. Hauptgebäude",
                        );
                        Self::form_row(ui, "Kapazität", &mut self.room_form.kapazitaet, "z.B. 30");
                    });
                let (c, s) =
                    Self::dialog_footer(ui, self.room_form.is_valid(), self.rooms.saving);
                cancel = c;
                save = s;
            });
        if cancel {
            self.dispatch(BackendCommand::CloseEditor(EntityTab::Rooms));
        }
        if save {
            let draft = self.room_form.clone();
            self.dispatch(BackendCommand::SaveRoom(draft));
        }
    }

    fn show_participant_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.participants.editor.clone() else {
            return;
        };
        let title = if editor.target.is_some() {
            "Teilnehmer bearbeiten"
        } else {
            "Neuer Teilnehmer"
        };
        let mut cancel = false;
        let mut save = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .frame(Self::dialog_frame(ctx))
            .show(ctx, |ui| {
                egui::Grid::new("participant_form")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        Self::form_row(
                            ui,
                            "Name *",
                            &mut self.participant_form.name,
                            "Erika Musterfrau",
                        );
                        Self::form_row(
                            ui,
                            "E-Mail",
                            &mut self.participant_form.email,
                            "erika@beispiel.de",
                        );
                        Self::form_row(
                            ui,
                            "Telefon",
                            &mut self.participant_form.telefon,
                            "+49 123 456789",
                        );
                        Self::form_row(
                            ui,
                            "Geburtsdatum",
                            &mut self.participant_form.geburtsdatum,
                            "JJJJ-MM-TT",
                        );
                    });
                let (c, s) = Self::dialog_footer(
                    ui,
                    self.participant_form.is_valid(),
                    self.participants.saving,
                );
                cancel = c;
                save = s;
            });
        if cancel {
            self.dispatch(BackendCommand::CloseEditor(EntityTab::Participants));
        }
        if save {
            let draft = self.participant_form.clone();
            self.dispatch(BackendCommand::SaveParticipant(draft));
        }
    }

    fn show_course_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.courses.editor.clone() else {
            return;
        };
        let title = if editor.target.is_some() {
            "Kurs bearbeiten"
        } else {
            "Neuer Kurs"
        };
        let mut cancel = false;
        let mut save = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .frame(Self::dialog_frame(ctx))
            .show(ctx, |ui| {
                egui::Grid::new("course_form")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        Self::form_row(ui, "Titel *", &mut self.course_form.titel, "Kursname");

                        ui.label(egui::RichText::new("Beschreibung").color(palette::TEXT));
                        ui.add(
                            egui::TextEdit::multiline(&mut self.course_form.beschreibung)
                                .hint_text("Kursbeschreibung...")
                                .desired_rows(3)
                                .desired_width(260.0),
                        );
                        ui.end_row();

                        Self::form_row(
                            ui,
                            "Startdatum",
                            &mut self.course_form.startdatum,
                            "JJJJ-MM-TT",
                        );
                        Self::form_row(
                            ui,
                            "Enddatum",
                            &mut self.course_form.enddatum,
                            "JJJJ-MM-TT",
                        );
                        Self::form_row(
                            ui,
                            "Max. Teilnehmer",
                            &mut self.course_form.max_teilnehmer,
                            "z.B. 20",
                        );
                        Self::form_row(ui, "Preis (€)", &mut self.course_form.preis, "z.B. 299");

                        ui.label(egui::RichText::new("Dozent").color(palette::TEXT));
                        let selected_dozent = self
                            .courses
                            .instructors
                            .iter()
                            .find(|r| r.record_id.as_str() == self.course_form.dozent)
                            .map(|r| r.fields.name.clone())
                            .unwrap_or_else(|| "Kein Dozent".to_string());
                        egui::ComboBox::from_id_salt("course_dozent")
                            .selected_text(selected_dozent)
                            .width(260.0)
                            .show_ui(ui, |ui| {
                                ui.selectable_value(
                                    &mut self.course_form.dozent,
                                    String::new(),
                                    "Kein Dozent",
                                );
                                for record in &self.courses.instructors {
                                    ui.selectable_value(
                                        &mut self.course_form.dozent,
                                        record.record_id.0.clone(),
                                        &record.fields.name,
                                    );
                                }
                            });
                        ui.end_row();

                        ui.label(egui::RichText::new("Raum").color(palette::TEXT));
                        let selected_raum = self
                            .courses
                            .rooms
                            .iter()
                            .find(|r| r.record_id.as_str() == self.course_form.raum)
                            .map(|r| match &r.fields.gebaeude {
                                Some(gebaeude) => {
                                    format!("{} ({gebaeude})", r.fields.raumname)
                                }
                                None => r.fields.raumname.clone(),
                            })
                            .unwrap_or_else(|| "Kein Raum".to_string());
                        egui::ComboBox::from_id_salt("course_raum")
                            .selected_text(selected_raum)
                            .width(260.0)
                            .show_ui(ui, |ui| {
                                ui.selectable_value(
                                    &mut self.course_form.raum,
                                    String::new(),
                                    "Kein Raum",
                                );
                                for record in &self.courses.rooms {
                                    let label = match &record.fields.gebaeude {
                                        Some(gebaeude) => {
                                            format!("{} ({gebaeude})", record.fields.raumname)
                                        }
                                        None => record.fields.raumname.clone(),
                                    };
                                    ui.selectable_value(
                                        &mut self.course_form.raum,
                                        record.record_id.0.clone(),
                                        label,
                                    );
                                }
                            });
                        ui.end_row();

                        ui.label(egui::RichText::new("Status").color(palette::TEXT));
                        egui::ComboBox::from_id_salt("course_status")
                            .selected_text(self.course_form.status.label())
                            .width(260.0)
                            .show_ui(ui, |ui| {
                                for status in CourseStatus::ALL {
                                    ui.selectable_value(
                                        &mut self.course_form.status,
                                        status,
                                        status.label(),
                                    );
                                }
                            });
                        ui.end_row();
                    });
                let (c, s) =
                    Self::dialog_footer(ui, self.course_form.is_valid(), self.courses.saving);
                cancel = c;
                save = s;
            });
        if cancel {
            self.dispatch(BackendCommand::CloseEditor(EntityTab::Courses));
        }
        if save {
            let draft = self.course_form.clone();
            self.dispatch(BackendCommand::SaveCourse(draft));
        }
    }

    fn show_enrollment_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.enrollments.editor.clone() else {
            return;
        };
        let title = if editor.target.is_some() {
            "Anmeldung bearbeiten"
        } else {
            "Neue Anmeldung"
        };
        let mut cancel = false;
        let mut save = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .frame(Self::dialog_frame(ctx))
            .show(ctx, |ui| {
                egui::Grid::new("enrollment_form")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("Teilnehmer *").color(palette::TEXT));
                        let selected_teilnehmer = self
                            .enrollments
                            .participants
                            .iter()
                            .find(|r| r.record_id.as_str() == self.enrollment_form.teilnehmer)
                            .map(|r| r.fields.name.clone())
                            .unwrap_or_else(|| "Bitte wählen...".to_string());
                        egui::ComboBox::from_id_salt("enrollment_teilnehmer")
                            .selected_text(selected_teilnehmer)
                            .width(260.0)
                            .show_ui(ui, |ui| {
                                ui.selectable_value(
                                    &mut self.enrollment_form.teilnehmer,
                                    String::new(),
                                    "Bitte wählen...",
                                );
                                for record in &self.enrollments.participants {
                                    ui.selectable_value(
                                        &mut self.enrollment_form.teilnehmer,
                                        record.record_id.0.clone(),
                                        &record.fields.name,
                                    );
                                }
                            });
                        ui.end_row();

                        ui.label(egui::RichText::new("Kurs *").color(palette::TEXT));
                        let selected_kurs = self
                            .enrollments
                            .courses
                            .iter()
                            .find(|r| r.record_id.as_str() == self.enrollment_form.kurs)
                            .map(|r| r.fields.titel.clone())
                            .unwrap_or_else(|| "Bitte wählen...".to_string());
                        egui::ComboBox::from_id_salt("enrollment_kurs")
                            .selected_text(selected_kurs)
                            .width(260.0)
                            .show_ui(ui, |ui| {
                                ui.selectable_value(
                                    &mut self.enrollment_form.kurs,
                                    String::new(),
                                    "Bitte wählen...",
                                );
                                for record in &self.enrollments.courses {
                                    ui.selectable_value(
                                        &mut self.enrollment_form.kurs,
                                        record.record_id.0.clone(),
                                        &record.fields.titel,
                                    );
                                }
                            });
                        ui.end_row();

                        Self::form_row(
                            ui,
                            "Anmeldedatum",
                            &mut self.enrollment_form.anmeldedatum,
                            "JJJJ-MM-TT",
                        );

                        ui.label("");
                        ui.checkbox(
                            &mut self.enrollment_form.bezahlt,
                            "Zahlung eingegangen",
                        );
                        ui.end_row();
                    });
                let (c, s) = Self::dialog_footer(
                    ui,
                    self.enrollment_form.is_valid(),
                    self.enrollments.saving,
                );
                cancel = c;
                save = s;
            });
        if cancel {
            self.dispatch(BackendCommand::CloseEditor(EntityTab::Enrollments));
        }
        if save {
            let draft = self.enrollment_form.clone();
            self.dispatch(BackendCommand::SaveEnrollment(draft));
        }
    }

    fn confirm_dialog(
        ctx: &egui::Context,
        title: &str,
        description: &str,
    ) -> Option<ConfirmAction> {
        let mut action = None;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .frame(Self::dialog_frame(ctx))
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(description).color(palette::TEXT_MUTED));
                ui.add_space(10.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let delete_button = egui::Button::new(
                        egui::RichText::new("Löschen").color(egui::Color32::WHITE),
                    )
                    .fill(palette::DESTRUCTIVE)
                    .corner_radius(egui::CornerRadius::same(6));
                    if ui.add(delete_button).clicked() {
                        action = Some(ConfirmAction::Confirm);
                    }
                    if ui.button("Abbrechen").clicked() {
                        action = Some(ConfirmAction::Cancel);
                    }
                });
            });
        action
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        if !self.active_pending_delete() {
            return;
        }
        let Some(entity) = self.active_tab.entity() else {
            return;
        };
        let (title, description) = match self.active_tab {
            Tab::Kurse => (
                "Kurs löschen",
                "Sind Sie sicher? Dieser Kurs wird dauerhaft gelöscht.",
            ),
            Tab::Dozenten => (
                "Dozent löschen",
                "Sind Sie sicher? Dieser Dozent wird dauerhaft gelöscht.",
            ),
            Tab::Teilnehmer => (
                "Teilnehmer löschen",
                "Sind Sie sicher? Dieser Teilnehmer wird dauerhaft gelöscht.",
            ),
            Tab::Raeume => (
                "Raum löschen",
                "Sind Sie sicher? Dieser Raum wird dauerhaft gelöscht.",
            ),
            Tab::Anmeldungen => (
                "Anmeldung löschen",
                "Sind Sie sicher? Diese Anmeldung wird dauerhaft gelöscht.",
            ),
            Tab::Uebersicht => return,
        };

        match Self::confirm_dialog(ctx, title, description) {
            Some(ConfirmAction::Cancel) => self.dispatch(BackendCommand::CancelDelete(entity)),
            Some(ConfirmAction::Confirm) => self.dispatch(BackendCommand::ConfirmDelete(entity)),
            None => {}
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.bootstrapped {
            self.bootstrapped = true;
            ctx.set_visuals(egui::Visuals::light());
            self.reload_active_tab();
        }

        self.process_ui_events();
        self.show_sidebar(ctx);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(palette::APP_BG)
                    .inner_margin(egui::Margin::symmetric(24, 20)),
            )
            .show(ctx, |ui| {
                self.show_status_banner(ui);
                egui::ScrollArea::vertical()
                    .id_salt("tab_content")
                    .auto_shrink([false, false])
                    .show(ui, |ui| match self.active_tab {
                        Tab::Uebersicht => self.show_overview(ui),
                        Tab::Kurse => self.show_courses(ui),
                        Tab::Dozenten => self.show_instructors(ui),
                        Tab::Teilnehmer => self.show_participants(ui),
                        Tab::Raeume => self.show_rooms(ui),
                        Tab::Anmeldungen => self.show_enrollments(ui),
                    });
            });

        match self.active_tab {
            Tab::Uebersicht => {}
            Tab::Kurse => self.show_course_editor(ctx),
            Tab::Dozenten => self.show_instructor_editor(ctx),
            Tab::Teilnehmer => self.show_participant_editor(ctx),
            Tab::Raeume => self.show_room_editor(ctx),
            Tab::Anmeldungen => self.show_enrollment_editor(ctx),
        }
        self.show_delete_confirmation(ctx);

        // Channel events arrive outside the egui event loop; poll regularly.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedUiSettings {
            active_tab: Some(self.active_tab),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

/// Opaque wrapper so `main` can pass restored settings without seeing them.
pub struct PersistedUiSettingsHandle(PersistedUiSettings);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_iso_dates_as_german() {
        assert_eq!(format_date_de("2026-08-08"), "08.08.2026");
        assert_eq!(format_date_de("2026-01-31"), "31.01.2026");
    }

    #[test]
    fn unparsable_dates_fall_back_to_the_raw_string() {
        assert_eq!(format_date_de("bald"), "bald");
        assert_eq!(format_date_de(""), "");
    }

    #[test]
    fn editor_adoption_fires_only_on_open_or_target_change() {
        let closed: Option<EditorState<InstructorDraft>> = None;
        let create = Some(EditorState {
            target: None,
            draft: InstructorDraft::default(),
        });
        let edit = Some(EditorState {
            target: Some(RecordId::new("rec_1")),
            draft: InstructorDraft::default(),
        });

        assert!(editor_newly_opened(&closed, &create));
        assert!(editor_newly_opened(&create, &edit));
        assert!(!editor_newly_opened(&create, &create));
        assert!(!editor_newly_opened(&edit, &closed));
    }

    #[test]
    fn every_entity_tab_is_reachable_from_navigation() {
        let entities: Vec<_> = Tab::NAV.iter().filter_map(|tab| tab.entity()).collect();
        assert_eq!(entities.len(), 5);
        assert_eq!(Tab::Uebersicht.entity(), None);
    }
}
