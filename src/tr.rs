//! User-facing Polish text, collected in one place: value suffixes, parameter
//! labels, validation problems and the automation error messages.

pub const SUFFIX_MONEY: &str = "\u{a0}zł";
pub const SUFFIX_PERCENT: &str = "%";

pub const LABEL_MINIMAL: &str = "Płaca minimalna";
pub const LABEL_COST_OF_OBTAINING: &str = "Koszty uzyskania";
pub const LABEL_TAX_FREE_ALLOWANCE: &str = "Kwota wolna od podatku";
pub const LABEL_FREE_AMOUNT: &str = "Kwota wolna";
pub const LABEL_HEALTH: &str = "Zdrowotne";
pub const LABEL_TAX_RATE: &str = "Stawka podatku";
pub const LABEL_PENSION: &str = "Ubezpieczenie\u{a0}emerytalne";
pub const LABEL_DISABILITY: &str = "Ubezpieczenie\u{a0}rentowe";
pub const LABEL_MEDICAL: &str = "Ubezpieczenie\u{a0}chorobowe";
pub const LABEL_ACCIDENT: &str = "Ubezpieczenie\u{a0}wypadkowe";
pub const LABEL_BENEFITS_FUND: &str = "FGŚP";

pub const VALIDATE_NAME_MISSING: &str = "Imię nie może być puste";
pub const VALIDATE_FAMILY_NAME_MISSING: &str = "Nazwisko nie może być puste";
pub const VALIDATE_SALARY_NEGATIVE: &str = "Pensja nie może być ujemna";
pub const VALIDATE_RATIO_INVALID: &str = "Wymiar czasu pracy musi być ułamkiem nie większym niż 1";

pub fn validate_pesel(pesel: &str) -> String {
    format!("Pesel '{pesel}' nie składa się z 11 cyfr")
}

pub fn pesel_already_registered(pesel: &str) -> String {
    format!("Pesel {pesel} jest już zarejestrowany")
}

pub fn pesel_not_found(pesel: &str) -> String {
    format!("Brak '{pesel}' na liście zarejestrowanych numerów pesel")
}

// Automation: document creation
pub const CANNOT_FIND_DOCUMENT_LIST: &str = "Nie mogę odnaleźć listy dokumentów";
pub const CANNOT_FIND_ADD_BUTTON: &str = "Nie mogę odnaleźć przycisku dodawania pustego dokumentu";
pub const CANNOT_FIND_NEW_DOCUMENT: &str = "Nie mogę odnaleźć nowego dokumentu";
pub const NEW_DOCUMENT_TOO_SLOW: &str = "Nowy pusty dokument ładuje się zbyt wolno";

pub fn cannot_find_report_switch(report_name: &str) -> String {
    format!("Nie mogę odnaleźć przełącznika odpowiedzialnego za dodanie raportu typu \"{report_name}\"")
}

pub fn cannot_create_report(report_name: &str) -> String {
    format!("Nie można było stworzyć raportu {report_name}")
}

// Automation: filling
pub fn cannot_resolve_input(address: &str) -> String {
    format!("Nie można było ustalić pola dla sekcji {address}")
}

// Automation: modal dialogs
pub const CANNOT_FIND_FORM_BUTTON: &str = "Nie mogę odnaleźć właściwego przycisku nad formularzem";
pub const CANNOT_FIND_MODAL: &str = "Nie mogę odnaleźć okienka dialogowego";

pub fn cannot_find_dialog(short_text: &str) -> String {
    format!("Nie mogę odnaleźć okna dialogowego \"{short_text}\"")
}

pub fn dialog_did_not_show(short_text: &str) -> String {
    format!("Okno dialogowe \"{short_text}\" nie pokazało się w oczekiwanym czasie")
}

pub fn cannot_find_dialog_close(short_text: &str) -> String {
    format!("Nie mogę odnaleźć przycisku zamykającego okno dialogowe \"{short_text}\"")
}

pub fn cannot_save_report(report_name: &str) -> String {
    format!("Nie można było zapisać raportu {report_name}")
}

pub fn cannot_close_report(report_name: &str) -> String {
    format!("Nie można było zamknąć raportu {report_name}")
}

pub fn document_saved(report_name: &str) -> String {
    format!("Dokument {report_name} został zapisany.")
}

pub const CONFIRM_CLOSE_FORM: &str = "Czy na pewno chcesz zamknąć formularz?";

// Automation: progress log lines
pub fn creating_report(title: &str) -> String {
    format!("Tworzę pusty raport dla {title}")
}

pub fn filling_report(title: &str) -> String {
    format!("Wypełniam {title}")
}

pub fn saving_report(title: &str) -> String {
    format!("Zapisuję {title}")
}

pub fn closing_report(title: &str) -> String {
    format!("Zamykam {title}")
}

pub const FILLING_IN_PROGRESS: &str = "Trwa wypełnianie formularzy";
pub const FILLING_DONE: &str = "Zapis zakończony";
