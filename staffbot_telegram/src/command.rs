use teloxide::types::BotCommand;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Clear,
    Employees,
    AddEmployee { args: String },
}

impl Command {
    fn all() -> Vec<BotCommand> {
        vec![
            BotCommand {
                command: "start".to_string(),
                description: "Начать работу с ботом".to_string(),
            },
            BotCommand {
                command: "help".to_string(),
                description: "Показать справку".to_string(),
            },
            BotCommand {
                command: "clear".to_string(),
                description: "Очистить контекст диалога".to_string(),
            },
            BotCommand {
                command: "employees".to_string(),
                description: "Список сотрудников".to_string(),
            },
            BotCommand {
                command: "addemployee".to_string(),
                description: "Добавить сотрудника (только для администраторов)".to_string(),
            },
        ]
    }

    #[must_use]
    pub fn bot_commands() -> Vec<BotCommand> {
        Self::all()
    }

    /// Parse a command from message text. The command token is matched
    /// case-insensitively with any `@botname` mention stripped; arguments
    /// keep their original casing (names are capitalized).
    #[must_use]
    pub fn parse_from_text(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if !trimmed.starts_with('/') {
            return None;
        }

        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let head = parts.next()?.to_lowercase();
        let head = head.split('@').next().unwrap_or(&head);
        let args = parts.next().unwrap_or("").trim().to_string();

        match head {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/clear" => Some(Self::Clear),
            "/employees" => Some(Self::Employees),
            "/addemployee" => Some(Self::AddEmployee { args }),
            _ => None,
        }
    }

    #[must_use]
    pub const fn help_text() -> &'static str {
        r"🤖 Корпоративный ассистент

Команды:
/start - начать работу с ботом
/clear - очистить контекст диалога
/employees - список сотрудников
/addemployee - добавить сотрудника (только для администраторов)
/help - показать эту справку

Спросите про сотрудника («Кто директор?», «Зорин должность?»,
«почта Ивана Ушакова») или просто напишите сообщение — отвечу."
    }

    #[must_use]
    pub const fn welcome_text() -> &'static str {
        r"👋 Привет! Я корпоративный ассистент.

Могу подсказать должность, отдел и контакты сотрудников,
а на любые другие вопросы отвечу как обычный ассистент.

Отправьте /help, чтобы посмотреть список команд."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_commands_parse() {
        assert_eq!(Command::parse_from_text("/start"), Some(Command::Start));
        assert_eq!(Command::parse_from_text("  /clear  "), Some(Command::Clear));
        assert_eq!(
            Command::parse_from_text("/employees"),
            Some(Command::Employees)
        );
    }

    #[test]
    fn bot_mention_is_stripped() {
        assert_eq!(
            Command::parse_from_text("/start@staff_bot"),
            Some(Command::Start)
        );
    }

    #[test]
    fn addemployee_keeps_argument_casing() {
        assert_eq!(
            Command::parse_from_text("/addemployee Анна Смирнова Бухгалтер"),
            Some(Command::AddEmployee {
                args: "Анна Смирнова Бухгалтер".to_string()
            })
        );
    }

    #[test]
    fn non_commands_do_not_parse() {
        assert_eq!(Command::parse_from_text("Иван Петров"), None);
        assert_eq!(Command::parse_from_text("/unknown"), None);
    }
}
