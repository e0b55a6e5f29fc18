const THEME_STORAGE_KEY: &str =
  "caseload.theme";
const SCHEDULE_VIEW_STORAGE_KEY:
  &str = "caseload.schedule_view";

#[derive(
  Clone, Copy, PartialEq, Eq, Debug,
)]
pub enum ThemeMode {
  Day,
  Night
}

impl ThemeMode {
  pub fn storage_value(
    self
  ) -> &'static str {
    match self {
      | ThemeMode::Day => "day",
      | ThemeMode::Night => "night"
    }
  }

  pub fn css_class(
    self
  ) -> &'static str {
    match self {
      | ThemeMode::Day => "theme-day",
      | ThemeMode::Night => {
        "theme-night"
      }
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | ThemeMode::Day => {
        ThemeMode::Night
      }
      | ThemeMode::Night => {
        ThemeMode::Day
      }
    }
  }
}

#[derive(
  Clone, Copy, PartialEq, Eq, Debug,
)]
pub enum ScheduleViewMode {
  Week,
  Day
}

impl ScheduleViewMode {
  pub fn storage_value(
    self
  ) -> &'static str {
    match self {
      | ScheduleViewMode::Week => {
        "week"
      }
      | ScheduleViewMode::Day => "day"
    }
  }
}

fn read_local(
  key: &str
) -> Option<String> {
  web_sys::window()
    .and_then(|window| {
      window
        .local_storage()
        .ok()
        .flatten()
    })
    .and_then(|storage| {
      storage.get_item(key).ok().flatten()
    })
}

fn write_local(key: &str, value: &str) {
  if let Some(storage) =
    web_sys::window().and_then(
      |window| {
        window
          .local_storage()
          .ok()
          .flatten()
      }
    )
  {
    let _ =
      storage.set_item(key, value);
  }
}

pub fn load_theme_mode() -> ThemeMode {
  match read_local(THEME_STORAGE_KEY)
    .as_deref()
  {
    | Some("night") => ThemeMode::Night,
    | _ => ThemeMode::Day
  }
}

pub fn save_theme_mode(
  theme: ThemeMode
) {
  write_local(
    THEME_STORAGE_KEY,
    theme.storage_value()
  );
}

pub fn load_schedule_view()
-> ScheduleViewMode {
  match read_local(
    SCHEDULE_VIEW_STORAGE_KEY
  )
  .as_deref()
  {
    | Some("day") => {
      ScheduleViewMode::Day
    }
    | _ => ScheduleViewMode::Week
  }
}

pub fn save_schedule_view(
  view: ScheduleViewMode
) {
  write_local(
    SCHEDULE_VIEW_STORAGE_KEY,
    view.storage_value()
  );
}
