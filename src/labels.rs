//! Russian UI strings and plural agreement.

use crate::config::ChecklistSection;
use crate::content::CalloutKind;

/// Word forms for 1, 2–4, and 5+ (Russian plural categories).
pub type Forms = [&'static str; 3];

pub const TRAVELS: Forms = ["путешествие", "путешествия", "путешествий"];
pub const LOCATIONS: Forms = ["место", "места", "мест"];
pub const DAYS: Forms = ["день", "дня", "дней"];
pub const COUNTRIES: Forms = ["страна", "страны", "стран"];
pub const PHOTOS: Forms = ["фотография", "фотографии", "фотографий"];
pub const ITEMS: Forms = ["пункт", "пункта", "пунктов"];

pub const BRAND: &str = "MeTravel";
pub const ANONYMOUS: &str = "Аноним";
pub const TOC_TITLE: &str = "Содержание";
pub const DESCRIPTION: &str = "Описание";
pub const RECOMMENDATIONS: &str = "Рекомендации";
pub const PLUSES: &str = "Плюсы";
pub const MINUSES: &str = "Минусы";
pub const ONLINE_VERSION: &str = "Онлайн-версия";
pub const ONLINE_HINT: &str = "Отсканируйте код, чтобы открыть путешествие с картой и всеми фото";
pub const GALLERY_TITLE: &str = "Фотогалерея";
pub const MAP_TITLE: &str = "Карта путешествия";
pub const MAP_UNAVAILABLE: &str = "Карта недоступна";
pub const LOCATIONS_TITLE: &str = "Локации";
pub const CHECKLIST_TITLE: &str = "Чек-лист путешественника";
pub const CHECKLIST_SUBTITLE: &str = "Отметьте, что уже собрано";
pub const CLOSING_TITLE: &str = "Спасибо за путешествия!";
pub const CLOSING_SUBTITLE: &str = "Пусть впереди будет ещё больше дорог";
pub const COUNTRY: &str = "Страна";
pub const YEAR: &str = "Год";
pub const DURATION: &str = "Длительность";
pub const PHOTO_CAPTION: &str = "Фото";

/// Plural form for `n`.
pub fn plural(n: u64, forms: Forms) -> &'static str {
    let [one, few, many] = forms;
    if (11..=14).contains(&(n % 100)) {
        return many;
    }
    match n % 10 {
        1 => one,
        2..=4 => few,
        _ => many,
    }
}

/// `"{n} {form}"`, e.g. `"3 путешествия"`.
pub fn count(n: u64, forms: Forms) -> String {
    format!("{n} {}", plural(n, forms))
}

/// `"И еще N мест"` under a truncated location legend.
pub fn more_locations(n: u64) -> String {
    format!("И еще {}", count(n, LOCATIONS))
}

/// `"Фотогалерея (N фото)"` over a gallery preview.
pub fn gallery_heading(n: usize) -> String {
    format!("{GALLERY_TITLE} ({n} фото)")
}

/// Default title for a callout without one.
pub fn callout_title(kind: CalloutKind) -> &'static str {
    match kind {
        CalloutKind::Info => "Информация",
        CalloutKind::Warning => "Важно",
        CalloutKind::Tip => "Совет",
        CalloutKind::Danger => "Осторожно",
    }
}

pub fn checklist_section(section: ChecklistSection) -> &'static str {
    match section {
        ChecklistSection::Clothing => "Одежда",
        ChecklistSection::Food => "Еда",
        ChecklistSection::Electronics => "Электроника",
        ChecklistSection::Documents => "Документы",
        ChecklistSection::Medicine => "Аптечка",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_categories() {
        assert_eq!(count(1, TRAVELS), "1 путешествие");
        assert_eq!(count(3, TRAVELS), "3 путешествия");
        assert_eq!(count(5, TRAVELS), "5 путешествий");
        assert_eq!(count(0, TRAVELS), "0 путешествий");
    }

    #[test]
    fn teens_take_the_many_form() {
        assert_eq!(plural(11, LOCATIONS), "мест");
        assert_eq!(plural(12, DAYS), "дней");
        assert_eq!(plural(114, COUNTRIES), "стран");
    }

    #[test]
    fn compound_numbers_follow_last_digit() {
        assert_eq!(plural(21, DAYS), "день");
        assert_eq!(plural(22, DAYS), "дня");
        assert_eq!(plural(101, LOCATIONS), "место");
    }

    #[test]
    fn composite_labels() {
        assert_eq!(more_locations(4), "И еще 4 места");
        assert_eq!(gallery_heading(9), "Фотогалерея (9 фото)");
    }
}
