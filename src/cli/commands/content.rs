use clap::{Arg, Command};

pub const CMD_DASHBOARD: &str = "dashboard";
pub const CMD_QUIZZES: &str = "quizzes";
pub const CMD_ANNOUNCEMENTS: &str = "announcements";

pub const CMD_LIST: &str = "list";
pub const CMD_CREATE: &str = "create";
pub const CMD_UPDATE: &str = "update";
pub const CMD_DELETE: &str = "delete";

pub const ARG_ID: &str = "id";
pub const ARG_TITLE: &str = "title";
pub const ARG_DESCRIPTION: &str = "description";
pub const ARG_QUESTIONS: &str = "questions";
pub const ARG_CONTENT: &str = "content";

fn id() -> Arg {
    Arg::new(ARG_ID).help("Record id").required(true)
}

fn title(required: bool) -> Arg {
    Arg::new(ARG_TITLE)
        .long("title")
        .help("Title")
        .required(required)
}

fn questions() -> Arg {
    Arg::new(ARG_QUESTIONS)
        .long("questions")
        .help("Path to a JSON array of questions")
        .long_help(
            "Path to a JSON array of questions, each {\"question\", \"options\", \"correctAnswer\"}",
        )
        .value_parser(clap::value_parser!(std::path::PathBuf))
}

fn collection(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new(CMD_LIST).about("List all records"))
        .subcommand(Command::new(CMD_DELETE).about("Delete a record").arg(id()))
}

#[must_use]
pub fn dashboard() -> Command {
    Command::new(CMD_DASHBOARD).about("Show the latest quizzes and announcements")
}

#[must_use]
pub fn quizzes() -> Command {
    collection(CMD_QUIZZES, "Manage quizzes")
        .subcommand(
            Command::new(CMD_CREATE)
                .about("Create a quiz")
                .arg(title(true))
                .arg(
                    Arg::new(ARG_DESCRIPTION)
                        .long("description")
                        .help("Description")
                        .required(true),
                )
                .arg(questions()),
        )
        .subcommand(
            Command::new(CMD_UPDATE)
                .about("Update a quiz")
                .arg(id())
                .arg(title(false))
                .arg(
                    Arg::new(ARG_DESCRIPTION)
                        .long("description")
                        .help("Description"),
                )
                .arg(questions()),
        )
}

#[must_use]
pub fn announcements() -> Command {
    collection(CMD_ANNOUNCEMENTS, "Manage announcements")
        .subcommand(
            Command::new(CMD_CREATE)
                .about("Publish an announcement")
                .arg(title(true))
                .arg(
                    Arg::new(ARG_CONTENT)
                        .long("content")
                        .help("Announcement body")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_UPDATE)
                .about("Update an announcement")
                .arg(id())
                .arg(title(false))
                .arg(
                    Arg::new(ARG_CONTENT)
                        .long("content")
                        .help("Announcement body"),
                ),
        )
}
