//! Reply formatting for directory answers.
//!
//! The three fixed literals below are part of the observable contract and
//! must stay byte-identical.

use staffbot_core::Employee;

/// Reply when a decided strategy finds no record.
pub const NOT_FOUND: &str = "Сотрудник не найден.";

/// Reply when a position question carries no usable name token, or the
/// query text is blank.
pub const CLARIFY_PROMPT: &str = "Уточните, пожалуйста, имя и фамилию сотрудника.";

/// Employee card: one line per present attribute, name always first.
#[must_use]
pub fn format_employee_info(employee: &Employee) -> String {
    let mut lines = vec![format!("👤 {}", employee.full_name())];

    if let Some(position) = &employee.position {
        lines.push(format!("💼 Должность: {position}"));
    }
    if let Some(department) = &employee.department {
        lines.push(format!("📂 Подразделение: {department}"));
    }
    if let Some(email) = &employee.email {
        lines.push(format!("✉ E-Mail: {email}"));
    }
    if let Some(phone) = &employee.phone {
        lines.push(format!("📱 Телефон: {phone}"));
    }
    if let Some((day, month)) = employee.birthday() {
        lines.push(format!("🎂 День рождения: {day}.{month}"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_employee() -> Employee {
        Employee {
            id: 1,
            first_name: "Иван".to_string(),
            last_name: "Петров".to_string(),
            email: None,
            phone: None,
            position: None,
            department: None,
            birthday_day: None,
            birthday_month: None,
        }
    }

    #[test]
    fn all_optionals_absent_renders_only_the_name_line() {
        assert_eq!(format_employee_info(&bare_employee()), "👤 Иван Петров");
    }

    #[test]
    fn full_card_lists_every_present_attribute() {
        let emp = Employee {
            email: Some("petrov@example.com".to_string()),
            phone: Some("+7 900 000-00-00".to_string()),
            position: Some("Инженер".to_string()),
            department: Some("Тех. отдел".to_string()),
            birthday_day: Some(3),
            birthday_month: Some(11),
            ..bare_employee()
        };
        assert_eq!(
            format_employee_info(&emp),
            "👤 Иван Петров\n\
             💼 Должность: Инженер\n\
             📂 Подразделение: Тех. отдел\n\
             ✉ E-Mail: petrov@example.com\n\
             📱 Телефон: +7 900 000-00-00\n\
             🎂 День рождения: 3.11"
        );
    }

    #[test]
    fn half_a_birthday_is_omitted_entirely() {
        let emp = Employee {
            birthday_day: Some(3),
            ..bare_employee()
        };
        assert_eq!(format_employee_info(&emp), "👤 Иван Петров");
    }
}
