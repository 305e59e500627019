//! Command orchestration helpers from UI actions to the backend queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::LoadOverview => "load_overview",
        BackendCommand::Load(_) => "load",
        BackendCommand::OpenCreate(_) => "open_create",
        BackendCommand::OpenEdit(..) => "open_edit",
        BackendCommand::CloseEditor(_) => "close_editor",
        BackendCommand::RequestDelete(..) => "request_delete",
        BackendCommand::CancelDelete(_) => "cancel_delete",
        BackendCommand::ConfirmDelete(_) => "confirm_delete",
        BackendCommand::SaveInstructor(_) => "save_instructor",
        BackendCommand::SaveRoom(_) => "save_room",
        BackendCommand::SaveParticipant(_) => "save_participant",
        BackendCommand::SaveCourse(_) => "save_course",
        BackendCommand::SaveEnrollment(_) => "save_enrollment",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Befehlswarteschlange ist voll; bitte erneut versuchen".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Hintergrunddienst nicht erreichbar; Anwendung neu starten".to_string();
        }
    }
}
