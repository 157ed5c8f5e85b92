//! Localized text tables for both conversation languages.

use crate::types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOption {
    pub icon: &'static str,
    pub text: &'static str,
    pub tooltip: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqLink {
    pub icon: &'static str,
    pub text: &'static str,
    pub query: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WelcomeText {
    pub title: &'static str,
    /// Plain-text lines of the welcome blurb
    pub info: [&'static str; 2],
    pub button: &'static str,
    pub button_tooltip: &'static str,
    pub lang_tooltip: &'static str,
    pub faq_links: [FaqLink; 3],
}

pub fn greeting(lang: Language) -> &'static str {
    match lang {
        Language::En => "🌾 Welcome to AgroBot 🌾 – your guide to Karnataka’s agro‑based industries. I’m here to help you explore crops, processing, business opportunities and more!",
        Language::Kn => "🌾 ಆಗ್ರೋಬಾಟ್ 🌾 ಗೆ ಸ್ವಾಗತ – ಕರ್ನಾಟಕದ ಕೃಷಿ‑ಆಧಾರಿತ ಉದ್ಯಮಗಳ ನಿಮ್ಮ ಮಾರ್ಗದರ್ಶಕ. ಬೆಳೆ, ಪ್ರಾಸೆಸಿಂಗ್, ವ್ಯವಹಾರ ಅವಕಾಶಗಳು ಮತ್ತು ಇನ್ನೂ ಹೆಚ್ಚಿನದನ್ನು ಹುಡುಕಲು ನಾನು ನಿಮ್ಮೊಂದಿದ್ದೇನೆ!",
    }
}

pub fn call_to_action(lang: Language) -> &'static str {
    match lang {
        Language::En => "Tap any option, ask a question, or speak in Kannada or English 🎤. You can also upload images of crops or processing units for specific guidance.",
        Language::Kn => "ಮೇಲಿನ ಆಯ್ಕೆಯನ್ನು ಟ್ಯಾಪ್ ಮಾಡಿ, ಪ್ರಶ್ನೆ ಕೇಳಿ ಅಥವಾ ಕನ್ನಡ/ಇಂಗ್ಲಿಷ್‌ನಲ್ಲಿ ಮಾತನಾಡಿ 🎤. ನಿರ್ದಿಷ್ಟ ಮಾರ್ಗದರ್ಶನಕ್ಕಾಗಿ ಬೆಳೆ ಅಥವಾ ಪ್ರಾಸೆಸಿಂಗ್ ಘಟಕದ ಚಿತ್ರಗಳನ್ನು ಅಪ್ಲೋಡ್ ಮಾಡಬಹುದು.",
    }
}

/// Shown when the model answers with nothing usable
pub fn did_not_understand(lang: Language) -> &'static str {
    match lang {
        Language::En => "I’m sorry, I didn’t understand that. Could you please ask in a different way or switch language?",
        Language::Kn => "ಕ್ಷಮಿಸಿ, ನಾನು ಅರ್ಥ ಮಾಡಿಕೊಳ್ಳಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ. ದಯವಿಟ್ಟು ಬೇರೆ ರೀತಿಯಲ್ಲಿ ಕೇಳಿ ಅಥವಾ ಭಾಷೆಯನ್ನು ಬದಲಾಯಿಸಿ?",
    }
}

pub fn connection_trouble(lang: Language) -> &'static str {
    match lang {
        Language::En => "Sorry, I'm having trouble connecting. Please try again later.",
        Language::Kn => "ಕ್ಷಮಿಸಿ, ಸಂಪರ್ಕದಲ್ಲಿ ತೊಂದರೆಯಾಗುತ್ತಿದೆ. ದಯವಿಟ್ಟು ನಂತರ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
    }
}

pub fn image_processing_failed(lang: Language) -> &'static str {
    match lang {
        Language::En => "Sorry, there was an error processing your image. Please try another one.",
        Language::Kn => "ಕ್ಷಮಿಸಿ, ನಿಮ್ಮ ಚಿತ್ರವನ್ನು ಸಂಸ್ಕರಿಸುವಲ್ಲಿ ದೋಷ ಉಂಟಾಯಿತು. ದಯವಿಟ್ಟು ಬೇರೆ ಚಿತ್ರವನ್ನು ಪ್ರಯತ್ನಿಸಿ.",
    }
}

pub fn menu_options(lang: Language) -> &'static [MenuOption; 5] {
    match lang {
        Language::En => &MENU_EN,
        Language::Kn => &MENU_KN,
    }
}

pub fn welcome(lang: Language) -> &'static WelcomeText {
    match lang {
        Language::En => &WELCOME_EN,
        Language::Kn => &WELCOME_KN,
    }
}

const MENU_EN: [MenuOption; 5] = [
    MenuOption {
        icon: "🌾",
        text: "Crop & Raw Material Info",
        tooltip: "Learn which raw materials feed which industries",
    },
    MenuOption {
        icon: "🏭",
        text: "Agro-Processing Units & Industries",
        tooltip: "Discover factories, units, and processing steps",
    },
    MenuOption {
        icon: "💡",
        text: "Innovations & Technology",
        tooltip: "Explore modern techniques and industrial innovations",
    },
    MenuOption {
        icon: "📜",
        text: "Government Schemes & Subsidies",
        tooltip: "Get guidance on funding, subsidies, and approvals",
    },
    MenuOption {
        icon: "💼",
        text: "Agro-Business Guidance / Startups",
        tooltip: "Advice for starting or expanding agro-industries",
    },
];

const MENU_KN: [MenuOption; 5] = [
    MenuOption {
        icon: "🌾",
        text: "ಬೆಳೆ ಮತ್ತು ಕಚ್ಚಾ ವಸ್ತುಗಳ ಮಾಹಿತಿ",
        tooltip: "ಯಾವ ಕಚ್ಚಾ ವಸ್ತುಗಳು ಯಾವ ಕೈಗಾರಿಕೆಗಳಿಗೆ ಬೇಕು ಎಂದು ತಿಳಿಯಿರಿ",
    },
    MenuOption {
        icon: "🏭",
        text: "ಕೃಷಿ ಸಂಸ್ಕರಣಾ ಘಟಕಗಳು ಮತ್ತು ಕೈಗಾರಿಕೆಗಳು",
        tooltip: "ಕಾರ್ಖಾನೆಗಳು, ಘಟಕಗಳು ಮತ್ತು ಸಂಸ್ಕರಣಾ ಹಂತಗಳನ್ನು ಅನ್ವೇಷಿಸಿ",
    },
    MenuOption {
        icon: "💡",
        text: "ಹೊಸ ಆವಿಷ್ಕಾರಗಳು ಮತ್ತು ತಂತ್ರಜ್ಞಾನ",
        tooltip: "ಆಧುನಿಕ ತಂತ್ರಗಳು ಮತ್ತು ಕೈಗಾರಿಕಾ ಆವಿಷ್ಕಾರಗಳನ್ನು ಅನ್ವೇಷಿಸಿ",
    },
    MenuOption {
        icon: "📜",
        text: "ಸರ್ಕಾರಿ ಯೋಜನೆಗಳು ಮತ್ತು ಸಬ್ಸಿಡಿಗಳು",
        tooltip: "ನಿಧಿ, ಸಬ್ಸಿಡಿ ಮತ್ತು ಅನುಮೋದನೆಗಳ ಬಗ್ಗೆ ಮಾರ್ಗದರ್ಶನ ಪಡೆಯಿರಿ",
    },
    MenuOption {
        icon: "💼",
        text: "ಕೃಷಿ-ವ್ಯವಹಾರ ಮಾರ್ಗದರ್ಶನ / ಸ್ಟಾರ್ಟ್‌ಅಪ್‌ಗಳು",
        tooltip: "ಕೃಷಿ-ಉದ್ಯಮಗಳನ್ನು ಪ್ರಾರಂಭಿಸಲು ಅಥವಾ ವಿಸ್ತರಿಸಲು ಸಲಹೆ",
    },
];

const WELCOME_EN: WelcomeText = WelcomeText {
    title: "🌾 Welcome to AgroBot 🌾🏭",
    info: [
        "Explore Karnataka’s rich agro-based industries – from coffee, silk, sugarcane, dairy, spices to food processing.",
        "Get insights on crops, processing units, business opportunities, and innovations!",
    ],
    button: "▶️ Start Chat",
    button_tooltip: "Tap Start to explore Karnataka’s agro-industries 🌱🏭",
    lang_tooltip: "Select your preferred language 🇮🇳",
    faq_links: [
        FaqLink {
            icon: "🌿",
            text: "Top Crops",
            query: "What are the top industrial crops in Karnataka?",
        },
        FaqLink {
            icon: "📜",
            text: "Government Schemes",
            query: "Tell me about government schemes for agro-business",
        },
        FaqLink {
            icon: "📈",
            text: "Market Info",
            query: "How can I get market price information?",
        },
    ],
};

const WELCOME_KN: WelcomeText = WelcomeText {
    title: "🌾 ಅಗ್ರೋಬಾಟ್ 🌾🏭 ಗೆ ಸ್ವಾಗತ",
    info: [
        "ಕಾಫಿ, ರೇಷ್ಮೆ, ಕಬ್ಬು, ಹಾಲು, ಮಸಾಲೆ ಮತ್ತು ಆಹಾರ ಪ್ರಾಸೆಸಿಂಗ್ ಸೇರಿದಂತೆ ಕರ್ನಾಟಕದ ಶ್ರೀಮಂತ ಕೃಷಿ-ಆಧಾರಿತ ಉದ್ಯಮಗಳನ್ನು ಅನ್ವೇಷಿಸಿ.",
        "ಬೆಳೆ, ಪ್ರಾಸೆಸಿಂಗ್ ಘಟಕಗಳು, ವ್ಯವಹಾರ ಅವಕಾಶಗಳು ಮತ್ತು ನವೀನ ತಂತ್ರಜ್ಞಾನಗಳ ಬಗ್ಗೆ ಮಾಹಿತಿ ಪಡೆಯಿರಿ!",
    ],
    button: "▶️ ಚಾಟ್ ಪ್ರಾರಂಭಿಸಿ",
    button_tooltip: "ಕರ್ನಾಟಕದ ಕೃಷಿ-ಆಧಾರಿತ ಉದ್ಯಮಗಳನ್ನು ಅನ್ವೇಷಿಸಲು ಟ್ಯಾಪ್ ಮಾಡಿ 🌱🏭",
    lang_tooltip: "ನಿಮ್ಮ ಆದ್ಯತೆಯ ಭಾಷೆಯನ್ನು ಆಯ್ಕೆಮಾಡಿ 🇮🇳",
    faq_links: [
        FaqLink {
            icon: "🌿",
            text: "ಪ್ರಮುಖ ಬೆಳೆಗಳು",
            query: "ಕರ್ನಾಟಕದ ಪ್ರಮುಖ ಕೈಗಾರಿಕಾ ಬೆಳೆಗಳು ಯಾವುವು?",
        },
        FaqLink {
            icon: "📜",
            text: "ಸರ್ಕಾರಿ ಯೋಜನೆಗಳು",
            query: "ಕೃಷಿ-ವ್ಯವಹಾರಕ್ಕಾಗಿ ಇರುವ ಸರ್ಕಾರಿ ಯೋಜನೆಗಳ ಬಗ್ಗೆ ತಿಳಿಸಿ",
        },
        FaqLink {
            icon: "📈",
            text: "ಮಾರುಕಟ್ಟೆ ಮಾಹಿತಿ",
            query: "ನಾನು ಮಾರುಕಟ್ಟೆ ಬೆಲೆ ಮಾಹಿತಿಯನ್ನು ಹೇಗೆ ಪಡೆಯಬಹುದು?",
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_language_has_tables() {
        for lang in Language::iter() {
            assert!(greeting(lang).contains("🌾"));
            assert!(!call_to_action(lang).is_empty());
            assert_eq!(menu_options(lang).len(), 5);
            assert_eq!(welcome(lang).faq_links.len(), 3);
            assert_ne!(connection_trouble(lang), image_processing_failed(lang));
        }
    }

    #[test]
    fn test_languages_differ() {
        assert_ne!(greeting(Language::En), greeting(Language::Kn));
        assert_ne!(
            connection_trouble(Language::En),
            connection_trouble(Language::Kn)
        );
        assert_eq!(
            menu_options(Language::En)[0].icon,
            menu_options(Language::Kn)[0].icon
        );
    }
}
