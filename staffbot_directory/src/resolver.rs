//! The ordered strategy chain that turns an admitted query into an answer.
//!
//! Strategies run in a fixed priority order and the first one that is
//! applicable produces the final outcome. A strategy miss is not always
//! terminal: the bare-name and department strategies deliberately yield
//! [`Resolution::Conversation`] on a miss, because their trigger signals are
//! weak enough that the text may be ordinary conversation.

use std::sync::Arc;

use staffbot_core::{AppError, Employee, Field, Predicate, RecordStore};
use tracing::debug;

use crate::classifier::position_question_patterns;
use crate::extract::{extract_capitalized_token, extract_email, extract_name};
use crate::format::{CLARIFY_PROMPT, NOT_FOUND, format_employee_info};

/// Outcome of the strategy chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A directory answer was produced; the caller must reply with it and
    /// must not invoke the conversational fallback.
    Handled(String),
    /// Nothing decided; the caller proceeds to conversation.
    Conversation,
}

/// Leading question words and prepositions stripped before a department
/// free-text match.
const LEADING_STOP_WORDS: &[&str] = &[
    "кто", "кого", "что", "какой", "какая", "какие", "чей", "чья", "в", "во", "из", "на", "у",
    "за", "работает", "работают", "есть", "ли",
];

pub struct DirectoryResolver {
    store: Arc<dyn RecordStore>,
}

impl DirectoryResolver {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Run the chain. `text` must already have been admitted by
    /// [`crate::classifier::is_directory_query`].
    pub async fn resolve(&self, text: &str) -> Result<Resolution, AppError> {
        if text.trim().is_empty() {
            return Ok(Resolution::Handled(CLARIFY_PROMPT.to_string()));
        }

        let low = text.to_lowercase();

        if let Some(resolution) = self.fixed_role_phrase(&low).await? {
            debug!("resolved by fixed role phrase");
            return Ok(resolution);
        }
        if let Some(resolution) = self.position_question(text, &low).await? {
            debug!("resolved by position question");
            return Ok(resolution);
        }
        if let Some(resolution) = self.bare_name(text).await? {
            debug!("resolved by bare name");
            return Ok(resolution);
        }
        if let Some(resolution) = self.email_lookup(text).await? {
            debug!("resolved by email");
            return Ok(resolution);
        }
        if let Some(resolution) = self.department_keyword(&low).await? {
            debug!("resolved by department keyword");
            return Ok(resolution);
        }

        Ok(Resolution::Conversation)
    }

    /// Strategy 1: fixed role phrases. These always decide the request.
    async fn fixed_role_phrase(&self, low: &str) -> Result<Option<Resolution>, AppError> {
        let predicate = if low.contains("главный бухгалтер") || low.contains("главбух") {
            Predicate::contains(Field::Position, "главный бухгалтер")
        } else if low.contains("директор") {
            Predicate::contains(Field::Position, "директор")
        } else if low.contains("руководитель") && low.contains("тех") {
            Predicate::And(vec![
                Predicate::contains(Field::Position, "руководитель"),
                Predicate::contains(Field::Department, "тех"),
            ])
        } else {
            return Ok(None);
        };

        let found = self.find_first(&predicate).await?;
        Ok(Some(found.map_or_else(
            || Resolution::Handled(NOT_FOUND.to_string()),
            |emp| Resolution::Handled(format_employee_info(&emp)),
        )))
    }

    /// Strategy 2: explicit position question. Always decides; the
    /// no-token case asks for clarification instead of falling through.
    async fn position_question(
        &self,
        text: &str,
        low: &str,
    ) -> Result<Option<Resolution>, AppError> {
        let triggered =
            low.contains("должност") || position_question_patterns().iter().any(|p| p.is_match(text));
        if !triggered {
            return Ok(None);
        }

        if let Some((first, last)) = extract_name(text) {
            let found = self.name_pair_lookup(&first, &last).await?;
            return Ok(Some(Self::report_position(found)));
        }

        if let Some(token) = extract_capitalized_token(text) {
            let predicate = Predicate::Or(vec![
                Predicate::contains(Field::LastName, token.clone()),
                Predicate::contains(Field::FirstName, token.clone()),
                Predicate::contains(Field::Email, token),
            ]);
            let found = self.find_first(&predicate).await?;
            return Ok(Some(Self::report_position(found)));
        }

        Ok(Some(Resolution::Handled(CLARIFY_PROMPT.to_string())))
    }

    /// Strategy 3: bare two-token name. The one strategy whose miss falls
    /// through to conversation, because two capitalized words may open an
    /// unrelated sentence.
    async fn bare_name(&self, text: &str) -> Result<Option<Resolution>, AppError> {
        let Some((first, last)) = extract_name(text) else {
            return Ok(None);
        };

        let found = self.name_pair_lookup(&first, &last).await?;
        Ok(Some(found.map_or(Resolution::Conversation, |emp| {
            Resolution::Handled(format_employee_info(&emp))
        })))
    }

    /// Strategy 4: an email address is unambiguous; a miss is a definitive
    /// "not found", never conversation.
    async fn email_lookup(&self, text: &str) -> Result<Option<Resolution>, AppError> {
        let Some(email) = extract_email(text) else {
            return Ok(None);
        };

        let found = self
            .find_first(&Predicate::equals(Field::Email, email))
            .await?;
        Ok(Some(found.map_or_else(
            || Resolution::Handled(NOT_FOUND.to_string()),
            |emp| Resolution::Handled(format_employee_info(&emp)),
        )))
    }

    /// Strategy 5: department free text, the least reliable signal. A miss
    /// falls through silently.
    async fn department_keyword(&self, low: &str) -> Result<Option<Resolution>, AppError> {
        if !(low.contains("отдел") || low.contains("подразделение") || low.contains("бухгалтерия"))
        {
            return Ok(None);
        }

        let needle = strip_leading_stop_words(low);
        if needle.is_empty() {
            return Ok(Some(Resolution::Conversation));
        }

        let found = self
            .find_first(&Predicate::contains(Field::Department, needle))
            .await?;
        Ok(Some(found.map_or(Resolution::Conversation, |emp| {
            Resolution::Handled(format_employee_info(&emp))
        })))
    }

    /// Exact `(first, last)`, then the swapped order (surname-first phrasing
    /// is common), then a four-way substring OR across both name fields.
    async fn name_pair_lookup(
        &self,
        first: &str,
        last: &str,
    ) -> Result<Option<Employee>, AppError> {
        let exact = Predicate::And(vec![
            Predicate::equals(Field::FirstName, first),
            Predicate::equals(Field::LastName, last),
        ]);
        if let Some(emp) = self.find_first(&exact).await? {
            return Ok(Some(emp));
        }

        let swapped = Predicate::And(vec![
            Predicate::equals(Field::FirstName, last),
            Predicate::equals(Field::LastName, first),
        ]);
        if let Some(emp) = self.find_first(&swapped).await? {
            return Ok(Some(emp));
        }

        let fuzzy = Predicate::Or(vec![
            Predicate::contains(Field::FirstName, first),
            Predicate::contains(Field::LastName, last),
            Predicate::contains(Field::FirstName, last),
            Predicate::contains(Field::LastName, first),
        ]);
        self.find_first(&fuzzy).await
    }

    fn report_position(found: Option<Employee>) -> Resolution {
        match found {
            Some(emp) => match &emp.position {
                Some(position) => Resolution::Handled(format!("Должность: {position}")),
                None => Resolution::Handled(format_employee_info(&emp)),
            },
            None => Resolution::Handled(NOT_FOUND.to_string()),
        }
    }

    async fn find_first(&self, predicate: &Predicate) -> Result<Option<Employee>, AppError> {
        self.store
            .find_first(predicate)
            .await
            .map_err(AppError::Database)
    }
}

fn strip_leading_stop_words(low: &str) -> String {
    let cleaned: String = low
        .chars()
        .filter(|c| !matches!(c, '?' | '!' | '.' | ','))
        .collect();

    let mut tokens = cleaned.split_whitespace().peekable();
    while let Some(token) = tokens.peek() {
        if LEADING_STOP_WORDS.contains(token) {
            tokens.next();
        } else {
            break;
        }
    }

    tokens.collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct MemStore {
        employees: Vec<Employee>,
    }

    #[async_trait]
    impl RecordStore for MemStore {
        async fn find_first(&self, predicate: &Predicate) -> anyhow::Result<Option<Employee>> {
            Ok(self
                .employees
                .iter()
                .find(|emp| predicate.matches(emp))
                .cloned())
        }

        async fn find_all(&self, predicate: &Predicate) -> anyhow::Result<Vec<Employee>> {
            Ok(self
                .employees
                .iter()
                .filter(|emp| predicate.matches(emp))
                .cloned()
                .collect())
        }
    }

    fn employee(id: i64, first: &str, last: &str) -> Employee {
        Employee {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            phone: None,
            position: None,
            department: None,
            birthday_day: None,
            birthday_month: None,
        }
    }

    fn resolver_with(employees: Vec<Employee>) -> DirectoryResolver {
        DirectoryResolver::new(Arc::new(MemStore { employees }))
    }

    #[tokio::test]
    async fn director_phrase_finds_by_position() {
        let mut director = employee(1, "Сергей", "Беляев");
        director.position = Some("Директор".to_string());
        let resolver = resolver_with(vec![employee(2, "Иван", "Ушаков"), director]);

        let resolution = resolution(&resolver, "а кто у нас директор?").await;
        let Resolution::Handled(text) = resolution else {
            panic!("director phrase must decide the request");
        };
        assert!(text.contains("Сергей Беляев"));
    }

    #[tokio::test]
    async fn director_phrase_with_no_match_is_not_found() {
        let resolver = resolver_with(vec![employee(1, "Иван", "Ушаков")]);
        assert_eq!(
            resolution(&resolver, "кто директор?").await,
            Resolution::Handled(NOT_FOUND.to_string())
        );
    }

    #[tokio::test]
    async fn chief_accountant_aliases_share_one_lookup() {
        let mut chief = employee(1, "Анастасия", "Андросова");
        chief.position = Some("Главный Бухгалтер".to_string());
        let resolver = resolver_with(vec![chief]);

        for query in ["кто главный бухгалтер?", "дай контакт главбуха"] {
            let Resolution::Handled(text) = resolution(&resolver, query).await else {
                panic!("fixed phrase must decide");
            };
            assert!(text.contains("Анастасия Андросова"), "query: {query}");
        }
    }

    #[tokio::test]
    async fn position_question_reports_position_line() {
        let mut zorin = employee(1, "Михаил", "Зорин");
        zorin.position = Some("Руководитель Тех. отдел".to_string());
        let resolver = resolver_with(vec![employee(2, "Иван", "Ушаков"), zorin]);

        assert_eq!(
            resolution(&resolver, "Зорин должность?").await,
            Resolution::Handled("Должность: Руководитель Тех. отдел".to_string())
        );
    }

    #[tokio::test]
    async fn position_question_without_position_returns_card() {
        let mut emp = employee(1, "Иван", "Ушаков");
        emp.department = Some("Тех. отдел".to_string());
        let resolver = resolver_with(vec![emp]);

        let Resolution::Handled(text) = resolution(&resolver, "Ушаков — какая должность?").await
        else {
            panic!("position question must decide");
        };
        assert!(text.starts_with("👤 Иван Ушаков"));
        assert!(text.contains("Подразделение: Тех. отдел"));
    }

    #[tokio::test]
    async fn position_question_with_name_pair_swapped_order() {
        let mut zorin = employee(1, "Михаил", "Зорин");
        zorin.position = Some("Руководитель Тех. отдел".to_string());
        let resolver = resolver_with(vec![zorin]);

        // Surname-first phrasing must still resolve via the swapped match.
        assert_eq!(
            resolution(&resolver, "Зорин Михаил — какая должность?").await,
            Resolution::Handled("Должность: Руководитель Тех. отдел".to_string())
        );
    }

    #[tokio::test]
    async fn position_question_without_any_token_asks_to_clarify() {
        let resolver = resolver_with(vec![]);
        assert_eq!(
            resolution(&resolver, "а какая должность?").await,
            Resolution::Handled(CLARIFY_PROMPT.to_string())
        );
    }

    #[tokio::test]
    async fn bare_name_hit_returns_card() {
        let mut emp = employee(1, "Иван", "Петров");
        emp.email = Some("petrov@example.com".to_string());
        let resolver = resolver_with(vec![emp]);

        let Resolution::Handled(text) = resolution(&resolver, "Иван Петров").await else {
            panic!("known name must be handled");
        };
        assert!(text.starts_with("👤 Иван Петров"));
    }

    #[tokio::test]
    async fn bare_name_total_miss_falls_through() {
        let resolver = resolver_with(vec![employee(1, "Иван", "Петров")]);
        assert_eq!(
            resolution(&resolver, "Анна Смирнова").await,
            Resolution::Conversation
        );
    }

    #[tokio::test]
    async fn bare_name_substring_fallback_matches() {
        let resolver = resolver_with(vec![employee(1, "Иван", "Иванов")]);
        // "Иван Иванова" is neither exact nor swapped-exact, but the
        // four-way substring OR catches it.
        let Resolution::Handled(text) = resolution(&resolver, "Иван Иванова").await else {
            panic!("substring fallback must match");
        };
        assert!(text.contains("Иван Иванов"));
    }

    #[tokio::test]
    async fn email_hit_and_miss_both_terminate() {
        let mut emp = employee(1, "Михаил", "Зорин");
        emp.email = Some("zorin@example.com".to_string());
        let resolver = resolver_with(vec![emp]);

        let Resolution::Handled(text) =
            resolution(&resolver, "кто такой ZORIN@example.com").await
        else {
            panic!("email must be handled");
        };
        assert!(text.contains("Михаил Зорин"));

        assert_eq!(
            resolution(&resolver, "почта nobody@example.com").await,
            Resolution::Handled(NOT_FOUND.to_string())
        );
    }

    #[tokio::test]
    async fn department_query_matches_stripped_remainder() {
        let mut emp = employee(1, "Вадим", "Стариков");
        emp.department = Some("Навикон, Руководитель Отдела продаж".to_string());
        let resolver = resolver_with(vec![emp]);

        let Resolution::Handled(text) =
            resolution(&resolver, "кто руководитель отдела продаж?").await
        else {
            panic!("department remainder must match");
        };
        assert!(text.contains("Вадим Стариков"));
    }

    #[tokio::test]
    async fn department_miss_falls_through_silently() {
        let resolver = resolver_with(vec![employee(1, "Иван", "Петров")]);
        assert_eq!(
            resolution(&resolver, "что делает наш отдел маркетинга?").await,
            Resolution::Conversation
        );
    }

    #[tokio::test]
    async fn ambiguous_department_tie_returns_one_of_the_ties() {
        let mut first = employee(1, "Антон", "Брусникин");
        first.department = Some("Навикон, Тех. отдел".to_string());
        first.position = Some("Руководитель".to_string());
        let mut second = employee(2, "Иван", "Ушаков");
        second.department = Some("Навикон, Тех. отдел".to_string());
        second.position = Some("Руководитель".to_string());
        let resolver = resolver_with(vec![first, second]);

        // Store order is implementation-defined; any tie member is valid.
        let Resolution::Handled(text) = resolution(&resolver, "кто руководитель тех отдела").await
        else {
            panic!("role phrase must decide");
        };
        assert!(text.contains("Антон Брусникин") || text.contains("Иван Ушаков"));
    }

    #[tokio::test]
    async fn blank_text_asks_to_clarify() {
        let resolver = resolver_with(vec![]);
        assert_eq!(
            resolution(&resolver, "   ").await,
            Resolution::Handled(CLARIFY_PROMPT.to_string())
        );
    }

    #[tokio::test]
    async fn plain_conversation_falls_through() {
        let resolver = resolver_with(vec![employee(1, "Иван", "Петров")]);
        assert_eq!(
            resolution(&resolver, "посоветуй книгу на вечер").await,
            Resolution::Conversation
        );
    }

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn resolution(resolver: &DirectoryResolver, text: &str) -> Resolution {
        resolver
            .resolve(text)
            .await
            .expect("in-memory store cannot fail")
    }
}
