use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub answer: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub online: fn(&str) -> String,
    pub offline: fn(&str) -> String,
    pub meta: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "field" | "" => Self::field(),
            "monsoon" => Self::monsoon(),
            "plain" => Self::plain(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::field()
            }
        }
    }

    fn field() -> Self {
        Self {
            title: |s| s.bright_green().bold().underline().to_string(),
            answer: |s| s.white().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            online: |s| s.cyan().to_string(),
            offline: |s| s.yellow().to_string(),
            meta: |s| s.bright_white().dimmed().italic().to_string(),
        }
    }

    fn monsoon() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            answer: |s| s.bright_white().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            online: |s| s.bright_cyan().to_string(),
            offline: |s| s.magenta().to_string(),
            meta: |s| s.bright_blue().dimmed().to_string(),
        }
    }

    fn plain() -> Self {
        Self {
            title: |s| s.to_string(),
            answer: |s| s.to_string(),
            line: |s| s.to_string(),
            online: |s| s.to_string(),
            offline: |s| s.to_string(),
            meta: |s| s.to_string(),
        }
    }
}
