//! Message and command handling.
//!
//! This is the outermost boundary: every typed failure coming out of the
//! pipeline or the commands is rendered into user text exactly here, via
//! [`AppError::user_message`], and processing of that message ends.

use crate::{Command, Result, TelegramBot, auth::is_admin, pipeline::MessagePipeline};
use staffbot_core::{AppError, Employee, Field, NewEmployee, Predicate, RecordStore};
use staffbot_directory::validate_new_employee;
use teloxide::{requests::Requester, types::Message};
use tracing::{info, warn};

/// Handle any incoming message: commands first, then the text pipeline.
pub async fn handle_message(bot: TelegramBot, msg: Message) -> Result<()> {
    let Some(text) = msg.text().map(ToOwned::to_owned) else {
        // Stickers, photos and other non-text content are out of scope.
        return Ok(());
    };

    if let Some(cmd) = Command::parse_from_text(&text) {
        return handle_command(bot, msg, cmd).await;
    }

    let chat_id = msg.chat.id.0;
    let user_id = sender_id(&msg);
    let username = sender_name(&msg);

    info!("[@{username}] Message: {text}");

    // Show typing indicator
    bot.bot
        .send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing)
        .await?;

    match bot.pipeline().handle_text(user_id, chat_id, &text).await {
        Ok(reply) => {
            info!("[@{username}] Response: {reply}");
            bot.bot.send_message(msg.chat.id, reply).await?;
        }
        Err(err) => {
            warn!("[@{username}] Message failed: {err}");
            bot.bot.send_message(msg.chat.id, err.user_message()).await?;
        }
    }

    Ok(())
}

/// Handle bot commands. Commands are never appended to session history.
pub async fn handle_command(bot: TelegramBot, msg: Message, cmd: Command) -> Result<()> {
    let chat_id = msg.chat.id.0;
    let user_id = sender_id(&msg);
    let username = sender_name(&msg);

    match cmd {
        Command::Start => {
            info!("[@{username}] Command: /start");
            bot.bot
                .send_message(msg.chat.id, Command::welcome_text())
                .await?;
        }
        Command::Help => {
            info!("[@{username}] Command: /help");
            bot.bot
                .send_message(msg.chat.id, Command::help_text())
                .await?;
        }
        Command::Clear => {
            info!("[@{username}] Command: /clear");
            let session_id = MessagePipeline::session_id(user_id, chat_id);
            bot.pipeline().sessions().clear(&session_id).await;
            bot.bot.send_message(msg.chat.id, "Контекст очищен.").await?;
        }
        Command::Employees => {
            info!("[@{username}] Command: /employees");
            let reply = match bot.storage().list_employees().await {
                Ok(employees) => format_employee_list(&employees),
                Err(e) => AppError::Database(e).user_message(),
            };
            bot.bot.send_message(msg.chat.id, reply).await?;
        }
        Command::AddEmployee { args } => {
            info!("[@{username}] Command: /addemployee");
            let reply = add_employee(&bot, user_id, &args).await;
            bot.bot.send_message(msg.chat.id, reply).await?;
        }
    }

    Ok(())
}

/// One line per employee, with position and birthday decorations only when
/// present.
fn format_employee_list(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "Список сотрудников пока пуст.".to_string();
    }

    employees
        .iter()
        .map(|emp| {
            let mut line = emp.full_name();
            if let Some(position) = &emp.position {
                line.push_str(&format!(" ({position})"));
            }
            if let Some((day, month)) = emp.birthday() {
                line.push_str(&format!(" 🎂 {day}.{month}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Admin-only employee creation. Validation problems are collected and
/// reported together; a duplicate email is rejected here, not by the store.
async fn add_employee(bot: &TelegramBot, user_id: Option<i64>, args: &str) -> String {
    if !is_admin(bot.admin_user_ids(), user_id) {
        return AppError::Authorization.user_message();
    }

    let Some(data) = parse_add_args(args) else {
        return "Использование: /addemployee Имя Фамилия [email] [Должность]".to_string();
    };

    if let Err(err) = validate_new_employee(&data) {
        return err.user_message();
    }

    if let Some(email) = &data.email {
        let duplicate = bot
            .storage()
            .find_first(&Predicate::equals(Field::Email, email.clone()))
            .await;
        match duplicate {
            Ok(Some(_)) => return "Сотрудник с таким email уже существует.".to_string(),
            Ok(None) => {}
            Err(e) => return AppError::Database(e).user_message(),
        }
    }

    match bot.storage().insert_employee(data).await {
        Ok(emp) => format!("Сотрудник \"{}\" добавлен.", emp.full_name()),
        Err(e) => AppError::Database(e).user_message(),
    }
}

/// `/addemployee Имя Фамилия [email] [Должность]` — an `@`-bearing token
/// anywhere after the name is treated as the email, the rest as position.
fn parse_add_args(args: &str) -> Option<NewEmployee> {
    let mut tokens = args.split_whitespace();
    let first_name = tokens.next()?.to_string();
    let last_name = tokens.next()?.to_string();

    let mut email = None;
    let mut position_tokens = Vec::new();
    for token in tokens {
        if email.is_none() && token.contains('@') {
            email = Some(token.to_string());
        } else {
            position_tokens.push(token);
        }
    }

    let position = if position_tokens.is_empty() {
        None
    } else {
        Some(position_tokens.join(" "))
    };

    Some(NewEmployee {
        first_name,
        last_name,
        email,
        position,
        ..NewEmployee::default()
    })
}

fn sender_id(msg: &Message) -> Option<i64> {
    msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok())
}

fn sender_name(msg: &Message) -> &str {
    msg.from
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown")
}
