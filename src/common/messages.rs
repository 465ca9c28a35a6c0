// src/common/messages.rs

// User-facing texts. Russian is the catalog's primary language, English the fallback.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    GuideBooksNotFound,
    GuideBookNotFound,
    WorksNotFound,
    WorkNotFound,
    InvalidPage,
    NotFound,
    PermissionDenied,
    InvalidToken,
    UserNotFound,
    ValidationFailed,
    MalformedBody,
    InvalidQuery,
    Internal,
}

impl Message {
    pub fn text(self, lang: &str) -> &'static str {
        match lang {
            "en" => self.en(),
            _ => self.ru(),
        }
    }

    fn ru(self) -> &'static str {
        match self {
            Message::GuideBooksNotFound => "Справочники не найдены.",
            Message::GuideBookNotFound => "Справочник не найден.",
            Message::WorksNotFound => "Работы в справочнике не найдены.",
            Message::WorkNotFound => "Работа не найдена.",
            Message::InvalidPage => "Неправильная страница.",
            Message::NotFound => "Не найдено.",
            Message::PermissionDenied => "У вас недостаточно прав для выполнения данного действия.",
            Message::InvalidToken => "Учетные данные не были предоставлены или недействительны.",
            Message::UserNotFound => "Пользователь не найден.",
            Message::ValidationFailed => "Одно или несколько полей заполнены неверно.",
            Message::MalformedBody => "Некорректное тело запроса.",
            Message::InvalidQuery => "Некорректные параметры запроса.",
            Message::Internal => "Произошла непредвиденная ошибка.",
        }
    }

    fn en(self) -> &'static str {
        match self {
            Message::GuideBooksNotFound => "Guidebooks not found.",
            Message::GuideBookNotFound => "Guidebook not found.",
            Message::WorksNotFound => "No works found in the guidebook.",
            Message::WorkNotFound => "Work not found.",
            Message::InvalidPage => "Invalid page.",
            Message::NotFound => "Not found.",
            Message::PermissionDenied => "You do not have permission to perform this action.",
            Message::InvalidToken => "Authentication credentials were not provided or are invalid.",
            Message::UserNotFound => "User not found.",
            Message::ValidationFailed => "One or more fields are invalid.",
            Message::MalformedBody => "Malformed request body.",
            Message::InvalidQuery => "Invalid query parameters.",
            Message::Internal => "An unexpected error occurred.",
        }
    }
}

/// Text for a validation error code, `None` for codes without a translation.
pub fn validation_text(code: &str, lang: &str) -> Option<&'static str> {
    let en = lang == "en";
    let text = match code {
        "required" if en => "This field is required.",
        "required" => "Обязательное поле.",
        "title_length" if en => "Title must be between 1 and 150 characters.",
        "title_length" => "Название должно содержать от 1 до 150 символов.",
        "min_value" if en => "Ensure this value is greater than or equal to 0.",
        "min_value" => "Убедитесь, что это значение больше либо равно 0.",
        "guidebook_not_found" if en => "Guidebook with this ID was not found.",
        "guidebook_not_found" => "Справочник с таким ID не найден.",
        "other_company" if en => "Guidebook belongs to another company.",
        "other_company" => "Справочник принадлежит другой компании.",
        "cycle" if en => "A guidebook cannot be nested inside itself.",
        "cycle" => "Справочник не может быть вложен сам в себя.",
        _ => return None,
    };
    Some(text)
}
