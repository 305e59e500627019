//! Store worker: owns the tokio runtime, the HTTP record store, and the five
//! entity controllers. Commands are processed strictly in arrival order, so
//! one controller never has two operations in flight.

use std::{sync::Arc, thread};

use client_core::{
    CoursesController, EnrollmentsController, HttpRecordStore, InstructorsController,
    OverviewController, ParticipantsController, RecordStore, RoomsController, StoreConfig,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::{BackendCommand, EntityTab};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Resolved connection settings handed over from `main`.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub base_url: String,
    pub api_token: String,
}

pub fn launch(settings: StoreSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Startup,
                    format!("failed to build backend runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let config = match StoreConfig::new(&settings.base_url, settings.api_token.clone()) {
                Ok(config) => config,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::Startup,
                        format!("{err:#}"),
                    )));
                    tracing::error!("invalid store settings: {err:#}");
                    return;
                }
            };

            tracing::info!(base_url = %config.base_url(), "store worker ready");
            let _ = ui_tx.try_send(UiEvent::Info("Mit dem Datenspeicher verbunden".to_string()));
            let store: Arc<dyn RecordStore> = Arc::new(HttpRecordStore::new(config));
            let mut overview = OverviewController::new(Arc::clone(&store));
            let mut instructors = InstructorsController::new(Arc::clone(&store));
            let mut rooms = RoomsController::new(Arc::clone(&store));
            let mut participants = ParticipantsController::new(Arc::clone(&store));
            let mut courses = CoursesController::new(Arc::clone(&store));
            let mut enrollments = EnrollmentsController::new(Arc::clone(&store));

            macro_rules! publish {
                ($controller:ident) => {
                    let _ = ui_tx.try_send(snapshot_event(&$controller));
                };
            }

            macro_rules! fallible {
                ($context:expr, $name:literal, $op:expr) => {
                    if let Err(err) = $op.await {
                        tracing::error!("backend: {} failed: {:#}", $name, err);
                        let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                            $context,
                            format!("{err:#}"),
                        )));
                    }
                };
            }

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadOverview => {
                        tracing::info!("backend: load overview");
                        overview.loading = true;
                        let _ = ui_tx.try_send(UiEvent::Overview(overview.snapshot()));
                        fallible!(UiErrorContext::Load, "load overview", overview.load());
                        let _ = ui_tx.try_send(UiEvent::Overview(overview.snapshot()));
                    }
                    BackendCommand::Load(tab) => {
                        tracing::info!(?tab, "backend: load");
                        match tab {
                            EntityTab::Instructors => {
                                instructors.loading = true;
                                publish!(instructors);
                                fallible!(UiErrorContext::Load, "load instructors", instructors.load());
                                publish!(instructors);
                            }
                            EntityTab::Rooms => {
                                rooms.loading = true;
                                publish!(rooms);
                                fallible!(UiErrorContext::Load, "load rooms", rooms.load());
                                publish!(rooms);
                            }
                            EntityTab::Participants => {
                                participants.loading = true;
                                publish!(participants);
                                fallible!(UiErrorContext::Load, "load participants", participants.load());
                                publish!(participants);
                            }
                            EntityTab::Courses => {
                                courses.loading = true;
                                publish!(courses);
                                fallible!(UiErrorContext::Load, "load courses", courses.load());
                                publish!(courses);
                            }
                            EntityTab::Enrollments => {
                                enrollments.loading = true;
                                publish!(enrollments);
                                fallible!(UiErrorContext::Load, "load enrollments", enrollments.load());
                                publish!(enrollments);
                            }
                        }
                    }
                    BackendCommand::OpenCreate(tab) => match tab {
                        EntityTab::Instructors => {
                            instructors.open_create();
                            publish!(instructors);
                        }
                        EntityTab::Rooms => {
                            rooms.open_create();
                            publish!(rooms);
                        }
                        EntityTab::Participants => {
                            participants.open_create();
                            publish!(participants);
                        }
                        EntityTab::Courses => {
                            courses.open_create();
                            publish!(courses);
                        }
                        EntityTab::Enrollments => {
                            enrollments.open_create();
                            publish!(enrollments);
                        }
                    },
                    BackendCommand::OpenEdit(tab, id) => match tab {
                        EntityTab::Instructors => {
                            instructors.open_edit(&id);
                            publish!(instructors);
                        }
                        EntityTab::Rooms => {
                            rooms.open_edit(&id);
                            publish!(rooms);
                        }
                        EntityTab::Participants => {
                            participants.open_edit(&id);
                            publish!(participants);
                        }
                        EntityTab::Courses => {
                            courses.open_edit(&id);
                            publish!(courses);
                        }
                        EntityTab::Enrollments => {
                            enrollments.open_edit(&id);
                            publish!(enrollments);
                        }
                    },
                    BackendCommand::CloseEditor(tab) => match tab {
                        EntityTab::Instructors => {
                            instructors.close_editor();
                            publish!(instructors);
                        }
                        EntityTab::Rooms => {
                            rooms.close_editor();
                            publish!(rooms);
                        }
                        EntityTab::Participants => {
                            participants.close_editor();
                            publish!(participants);
                        }
                        EntityTab::Courses => {
                            courses.close_editor();
                            publish!(courses);
                        }
                        EntityTab::Enrollments => {
                            enrollments.close_editor();
                            publish!(enrollments);
                        }
                    },
                    BackendCommand::RequestDelete(tab, id) => match tab {
                        EntityTab::Instructors => {
                            instructors.request_delete(id);
                            publish!(instructors);
                        }
                        EntityTab::Rooms => {
                            rooms.request_delete(id);
                            publish!(rooms);
                        }
                        EntityTab::Participants => {
                            participants.request_delete(id);
                            publish!(participants);
                        }
                        EntityTab::Courses => {
                            courses.request_delete(id);
                            publish!(courses);
                        }
                        EntityTab::Enrollments => {
                            enrollments.request_delete(id);
                            publish!(enrollments);
                        }
                    },
                    BackendCommand::CancelDelete(tab) => match tab {
                        EntityTab::Instructors => {
                            instructors.cancel_delete();
                            publish!(instructors);
                        }
                        EntityTab::Rooms => {
                            rooms.cancel_delete();
                            publish!(rooms);
                        }
                        EntityTab::Participants => {
                            participants.cancel_delete();
                            publish!(participants);
                        }
                        EntityTab::Courses => {
                            courses.cancel_delete();
                            publish!(courses);
                        }
                        EntityTab::Enrollments => {
                            enrollments.cancel_delete();
                            publish!(enrollments);
                        }
                    },
                    BackendCommand::ConfirmDelete(tab) => {
                        tracing::info!(?tab, "backend: confirm delete");
                        match tab {
                            EntityTab::Instructors => {
                                fallible!(UiErrorContext::Delete, "delete instructor", instructors.confirm_delete());
                                publish!(instructors);
                            }
                            EntityTab::Rooms => {
                                fallible!(UiErrorContext::Delete, "delete room", rooms.confirm_delete());
                                publish!(rooms);
                            }
                            EntityTab::Participants => {
                                fallible!(UiErrorContext::Delete, "delete participant", participants.confirm_delete());
                                publish!(participants);
                            }
                            EntityTab::Courses => {
                                fallible!(UiErrorContext::Delete, "delete course", courses.confirm_delete());
                                publish!(courses);
                            }
                            EntityTab::Enrollments => {
                                fallible!(UiErrorContext::Delete, "delete enrollment", enrollments.confirm_delete());
                                publish!(enrollments);
                            }
                        }
                    }
                    BackendCommand::SaveInstructor(draft) => {
                        tracing::info!("backend: save instructor");
                        instructors.saving = true;
                        publish!(instructors);
                        fallible!(UiErrorContext::Save, "save instructor", instructors.save(draft));
                        publish!(instructors);
                    }
                    BackendCommand::SaveRoom(draft) => {
                        tracing::info!("backend: save room");
                        rooms.saving = true;
                        publish!(rooms);
                        fallible!(UiErrorContext::Save, "save room", rooms.save(draft));
                        publish!(rooms);
                    }
                    BackendCommand::SaveParticipant(draft) => {
                        tracing::info!("backend: save participant");
                        participants.saving = true;
                        publish!(participants);
                        fallible!(UiErrorContext::Save, "save participant", participants.save(draft));
                        publish!(participants);
                    }
                    BackendCommand::SaveCourse(draft) => {
                        tracing::info!("backend: save course");
                        courses.saving = true;
                        publish!(courses);
                        fallible!(UiErrorContext::Save, "save course", courses.save(draft));
                        publish!(courses);
                    }
                    BackendCommand::SaveEnrollment(draft) => {
                        tracing::info!("backend: save enrollment");
                        enrollments.saving = true;
                        publish!(enrollments);
                        fallible!(UiErrorContext::Save, "save enrollment", enrollments.save(draft));
                        publish!(enrollments);
                    }
                }
            }
        });
    });
}

trait SnapshotEvent {
    fn event(&self) -> UiEvent;
}

impl SnapshotEvent for InstructorsController {
    fn event(&self) -> UiEvent {
        UiEvent::Instructors(self.snapshot())
    }
}

impl SnapshotEvent for RoomsController {
    fn event(&self) -> UiEvent {
        UiEvent::Rooms(self.snapshot())
    }
}

impl SnapshotEvent for ParticipantsController {
    fn event(&self) -> UiEvent {
        UiEvent::Participants(self.snapshot())
    }
}

impl SnapshotEvent for CoursesController {
    fn event(&self) -> UiEvent {
        UiEvent::Courses(self.snapshot())
    }
}

impl SnapshotEvent for EnrollmentsController {
    fn event(&self) -> UiEvent {
        UiEvent::Enrollments(self.snapshot())
    }
}

fn snapshot_event<C: SnapshotEvent>(controller: &C) -> UiEvent {
    controller.event()
}
