//! Localized UI text
//!
//! Every supported language maps to one immutable table of labels and
//! messages. The table is resolved once per session from the language
//! selector and shared by the pipeline (default advice) and the surfaces.

use crate::{Severity, WhisperError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interface and translation target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Telugu];

    /// Two-letter code used by the translation backend
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Telugu => "te",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
        }
    }

    /// Static UI text table for this language
    #[must_use]
    pub fn ui_text(self) -> &'static UiText {
        match self {
            Language::English => &ENGLISH,
            Language::Hindi => &HINDI,
            Language::Telugu => &TELUGU,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = WhisperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.name().eq_ignore_ascii_case(wanted) || lang.code().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                WhisperError::validation(format!(
                    "Unsupported language '{wanted}'. Must be one of: English, Hindi, Telugu"
                ))
            })
    }
}

/// Labels and messages shown to the user
#[derive(Debug, Serialize)]
pub struct UiText {
    pub report_title: &'static str,
    pub city_label: &'static str,
    pub severity_label: &'static str,
    /// Localized names for Low, Moderate, High, Extreme
    pub severity_options: [&'static str; 4],
    pub describe_label: &'static str,
    pub analyze_button: &'static str,
    pub weather_title: &'static str,
    pub weather_description: &'static str,
    pub persistent_title: &'static str,
    pub advice_header: &'static str,
    pub default_advice: &'static str,
    pub sms_success: &'static str,
    pub sms_failure: &'static str,
}

impl UiText {
    /// Localized name of a severity level
    #[must_use]
    pub fn severity_name(&self, severity: Severity) -> &'static str {
        self.severity_options[severity.index()]
    }
}

static ENGLISH: UiText = UiText {
    report_title: "Report a Situation",
    city_label: "City / Pincode / Landmark",
    severity_label: "Severity",
    severity_options: ["Low", "Moderate", "High", "Extreme"],
    describe_label: "Describe the situation",
    analyze_button: "Analyze & Show Map",
    weather_title: "Live Weather & Alerts",
    weather_description: "OpenWeather shows real-time data & alerts (requires API key).",
    persistent_title: "✅ Last Generated Advice",
    advice_header: "AI-Generated Safety Advice",
    default_advice: "Stay alert! Move to a safe area immediately if danger is nearby.",
    sms_success: "📱 Alert messages successfully sent to local residents.",
    sms_failure: "⚠ SMS alert failed. Please check Twilio configuration.",
};

static HINDI: UiText = UiText {
    report_title: "स्थिति की रिपोर्ट करें",
    city_label: "शहर / पिनकोड / स्थान",
    severity_label: "गंभीरता",
    severity_options: ["कम", "मध्यम", "उच्च", "अत्यधिक"],
    describe_label: "स्थिति का वर्णन करें",
    analyze_button: "विश्लेषण करें और मानचित्र दिखाएँ",
    weather_title: "लाइव मौसम और अलर्ट",
    weather_description: "ओपनवेदर वास्तविक समय डेटा और अलर्ट दिखाता है (API कुंजी आवश्यक)।",
    persistent_title: "✅ अंतिम उत्पन्न सलाह",
    advice_header: "एआई द्वारा उत्पन्न सुरक्षा सलाह",
    default_advice: "सतर्क रहें! खतरा पास हो तो तुरंत सुरक्षित स्थान पर जाएं।",
    sms_success: "📱 स्थानीय लोगों को अलर्ट संदेश भेजे गए हैं।",
    sms_failure: "⚠ एसएमएस अलर्ट विफल। कृपया ट्विलियो सेटिंग जांचें।",
};

static TELUGU: UiText = UiText {
    report_title: "పరిస్థితిని నివేదించండి",
    city_label: "నగరం / పిన్‌కోడ్ / ప్రదేశం",
    severity_label: "తీవ్రత",
    severity_options: ["తక్కువ", "మోస్తరు", "అధిక", "తీవ్రమైనది"],
    describe_label: "పరిస్థితిని వివరించండి",
    analyze_button: "విశ్లేషించి మ్యాప్ చూపించు",
    weather_title: "ప్రత్యక్ష వాతావరణం మరియు హెచ్చరికలు",
    weather_description: "ఓపెన్‌వెదర్ రియల్‌టైమ్ డేటా మరియు హెచ్చరికలను చూపుతుంది (API కీ అవసరం).",
    persistent_title: "✅ చివరిగా రూపొందించిన సలహా",
    advice_header: "AI సృష్టించిన భద్రతా సలహా",
    default_advice: "జాగ్రత్తగా ఉండండి! ప్రమాదం దగ్గరలో ఉంటే వెంటనే సురక్షిత ప్రదేశానికి వెళ్ళండి.",
    sms_success: "📱 స్థానిక ప్రజలకు హెచ్చరిక సందేశాలు పంపబడ్డాయి.",
    sms_failure: "⚠ SMS హెచ్చరిక విఫలమైంది. దయచేసి Twilio కాన్ఫిగరేషన్ తనిఖీ చేయండి.",
};
