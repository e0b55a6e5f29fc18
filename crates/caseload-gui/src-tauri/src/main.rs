mod commands;
mod state;

use std::env;

use anyhow::Context;
use tracing::{
  error,
  info,
  warn
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{
  EnvFilter,
  fmt
};

fn init_tracing() {
  let filter =
    EnvFilter::try_from_default_env()
      .or_else(|_| {
        EnvFilter::try_new(
          "info,caseload_gui_tauri=\
           debug,caseload_core=debug"
        )
      })
      .unwrap_or_else(|_| {
        EnvFilter::new("info")
      });

  let _ =
    tracing_subscriber::registry()
      .with(filter)
      .with(
        fmt::layer()
          .with_target(true)
          .with_line_number(true)
      )
      .try_init();
}

#[cfg(target_os = "linux")]
fn configure_wayland_defaults() {
  let defaults = [
    // Prefer native Wayland backend
    // for GTK/WebKit.
    ("GDK_BACKEND", "wayland"),
    // Keep winit on Wayland to avoid
    // mixed backend behavior.
    ("WINIT_UNIX_BACKEND", "wayland"),
    // Work around compositor/driver
    // dmabuf instability on some
    // systems.
    (
      "WEBKIT_DISABLE_DMABUF_RENDERER",
      "1"
    )
  ];

  for (key, value) in defaults {
    if env::var_os(key).is_none() {
      unsafe {
        env::set_var(key, value);
      }
      info!(
        key,
        value,
        "set linux GUI runtime default"
      );
    } else {
      info!(
        key,
        "preserving existing linux \
         GUI runtime value"
      );
    }
  }
}

#[cfg(not(target_os = "linux"))]
fn configure_wayland_defaults() {}

fn main() {
  init_tracing();
  configure_wayland_defaults();

  info!(
    "starting Caseload GUI backend"
  );

  let state =
    match state::AppState::new()
      .context(
        "failed to initialize app \
         state"
      ) {
      | Ok(state) => state,
      | Err(err) => {
        error!(error = %err, "initialization failed");
        std::process::exit(1);
      }
    };

  tauri::Builder::default()
    .setup(|app| {
      install_signal_handlers(
        app.handle().clone()
      );
      Ok(())
    })
    .manage(state)
    .invoke_handler(
      tauri::generate_handler![
        commands::session_get,
        commands::appointments_list,
        commands::appointment_create,
        commands::appointment_update,
        commands::appointment_delete,
        commands::clients_list,
        commands::client_get,
        commands::note_get_by_appointment,
        commands::ui_log,
      ]
    )
    .run(tauri::generate_context!())
    .expect(
      "error while running Caseload \
       GUI backend"
    );
}

fn install_signal_handlers(
  app_handle: tauri::AppHandle
) {
  tauri::async_runtime::spawn(
    async move {
      wait_for_shutdown_signal().await;
      warn!(
        "received shutdown signal; \
         exiting application"
      );
      app_handle.exit(0);
    }
  );
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
  use tokio::signal::unix::{
    SignalKind,
    signal
  };

  let mut sigint = match signal(
    SignalKind::interrupt()
  ) {
    | Ok(stream) => stream,
    | Err(error) => {
      error!(
        %error,
        "failed to register SIGINT \
         handler; falling back to \
         ctrl_c"
      );
      let _ =
        tokio::signal::ctrl_c().await;
      return;
    }
  };

  let mut sigterm = match signal(
    SignalKind::terminate()
  ) {
    | Ok(stream) => stream,
    | Err(error) => {
      error!(
        %error,
        "failed to register SIGTERM \
         handler; falling back to \
         ctrl_c"
      );
      let _ =
        tokio::signal::ctrl_c().await;
      return;
    }
  };

  tokio::select! {
    _ = sigint.recv() => {}
    _ = sigterm.recv() => {}
  }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
  if let Err(error) =
    tokio::signal::ctrl_c().await
  {
    error!(
      %error,
      "failed waiting for ctrl_c \
       signal"
    );
  }
}
