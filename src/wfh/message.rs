use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};

/// Local time from which an announcement refers to the next working day.
pub const CUTOFF: NaiveTime = match NaiveTime::from_hms_opt(10, 15, 0) {
    Some(time) => time,
    None => panic!("cutoff is not a valid time of day"),
};

/// Characters stripped from both ends of the echoed command text.
const DECORATION: &[char] = &['"', '\'', '`', '_', '*', '~'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Today,
    Tomorrow,
    Monday,
}

impl Template {
    pub fn render(self, user_id: &str) -> String {
        match self {
            Template::Today => format!("<@{user_id}> is working from home today"),
            Template::Tomorrow => format!("<@{user_id}> will be working from home tomorrow"),
            Template::Monday => format!("<@{user_id}> will be working from home on Monday"),
        }
    }
}

/// Picks the template for a wall-clock time in the team's timezone.
///
/// Friday before the cutoff is an ordinary "today".
pub fn select_template(local: NaiveDateTime) -> Template {
    let past_cutoff = local.time() >= CUTOFF;

    match local.weekday() {
        Weekday::Sat | Weekday::Sun => Template::Monday,
        Weekday::Fri if past_cutoff => Template::Monday,
        _ if past_cutoff => Template::Tomorrow,
        _ => Template::Today,
    }
}

/// Renders the announcement, echoing the command text as `: _text_` when the
/// user typed something.
pub fn compose(template: Template, user_id: &str, text: &str) -> String {
    let mut message = template.render(user_id);

    let note = text.trim().trim_matches(DECORATION).trim();
    if !note.is_empty() {
        message.push_str(&format!(": _{note}_"));
    }

    message
}
