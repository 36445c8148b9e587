use dioxus::prelude::*;
use store::PrivacyNotice;

use crate::components::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, CardTitle, Collapsible,
};
use crate::icons::{FaArrowLeft, FaShield, FaXmark};
use crate::platform::make_preferences;
use crate::Icon;

const NOTICE_TEXT: &str = "We use strong encryption to protect your data. All sensitive \
information including child profiles, trip routes, and messages are encrypted at rest and in \
transit. We never share your data with third parties.";

/// One-time notice, hidden for good once acknowledged.
#[component]
pub fn PrivacyNoticeBanner() -> Element {
    let mut visible = use_signal(|| PrivacyNotice::new(make_preferences()).should_show());

    let acknowledge = move |_| {
        PrivacyNotice::new(make_preferences()).acknowledge();
        tracing::info!("privacy notice acknowledged");
        visible.set(false);
    };

    if !visible() {
        return rsx! {};
    }

    rsx! {
        div { class: "privacy-banner", role: "dialog",
            span { class: "privacy-banner-icon",
                Icon { icon: FaShield, width: 18, height: 18 }
            }
            div { class: "privacy-banner-body",
                p { class: "privacy-banner-title", "Your Privacy Matters" }
                p { class: "privacy-banner-text", "{NOTICE_TEXT}" }
                Button { size: ButtonSize::Small, class: "w-full", onclick: acknowledge, "I Understand" }
            }
            button {
                class: "privacy-banner-close",
                title: "Close",
                onclick: acknowledge,
                Icon { icon: FaXmark, width: 14, height: 14 }
            }
        }
    }
}

struct PolicySection {
    title: &'static str,
    paragraphs: &'static [&'static str],
    bullets: &'static [&'static str],
}

const POLICY: &[PolicySection] = &[
    PolicySection {
        title: "Our Commitment to Your Privacy",
        paragraphs: &[
            "At SafeRide, we take your privacy seriously. This Privacy Policy explains how we collect, use, store, and protect your personal information when you use our school transportation management application.",
            "We are committed to transparency and giving you control over your data. This policy applies to all users of SafeRide, including parents, drivers, and administrators.",
        ],
        bullets: &[],
    },
    PolicySection {
        title: "Information We Collect",
        paragraphs: &[],
        bullets: &[
            "User profile information (name, contact details)",
            "Child profiles (name, grade, allergies, emergency contacts)",
            "Trip booking details (pickup/dropoff locations, scheduled times)",
            "Real-time GPS location data (for drivers during active trips)",
            "Chat messages between parents and drivers",
            "Emergency alert information",
        ],
    },
    PolicySection {
        title: "Data Encryption & Security",
        paragraphs: &[
            "All sensitive data is encrypted before being stored and all data transmitted between your device and our servers is encrypted using TLS.",
            "Data is decrypted only for authorized users. Parents can only access their own children's information, and drivers can only view data for trips assigned to them.",
        ],
        bullets: &[],
    },
    PolicySection {
        title: "How We Use Your Information",
        paragraphs: &[],
        bullets: &[
            "To provide and maintain our transportation management services",
            "To facilitate communication between parents and drivers",
            "To enable real-time tracking and trip status updates",
            "To ensure child safety through emergency contact information",
            "To comply with legal obligations and protect user safety",
        ],
    },
    PolicySection {
        title: "Data Sharing & Third Parties",
        paragraphs: &[
            "SafeRide does not sell, rent, or share your personal information with third parties for marketing purposes. We may disclose information only when required by law, to protect the safety of our users, in emergencies involving child safety, or with your explicit consent.",
        ],
        bullets: &[],
    },
    PolicySection {
        title: "Your Rights",
        paragraphs: &[
            "You can request access to, correction of, deletion of, or a portable copy of your personal data, and object to certain processing. Contact us through the application or your administrator.",
        ],
        bullets: &[],
    },
    PolicySection {
        title: "Data Retention",
        paragraphs: &[
            "We retain personal information only as long as necessary to provide our services. Trip history and chat messages can be deleted upon request. Child profiles remain active until you choose to remove them.",
        ],
        bullets: &[],
    },
    PolicySection {
        title: "Contact Us",
        paragraphs: &[
            "If you have any questions about this Privacy Policy, please contact your school administrator or reach out through the SafeRide application support channels.",
        ],
        bullets: &[],
    },
];

/// Sections rendered expanded; the rest start collapsed.
const EXPANDED_SECTIONS: usize = 3;

#[component]
pub fn PrivacyPolicyView(on_close: EventHandler<()>) -> Element {
    rsx! {
        div { class: "view-page privacy-policy",
            div { class: "privacy-policy-toolbar",
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: move |_| on_close.call(()),
                    Icon { icon: FaArrowLeft, width: 14, height: 14 }
                    " Back"
                }
            }
            div { class: "view-title-row",
                Icon { icon: FaShield, width: 28, height: 28 }
                h1 { class: "view-title", "Privacy Policy" }
            }
            p { class: "view-muted", "Last updated: December 31, 2025" }

            for (idx, section) in POLICY.iter().enumerate() {
                Card { key: "{section.title}",
                    if idx < EXPANDED_SECTIONS {
                        CardHeader {
                            CardTitle { "{section.title}" }
                        }
                        CardContent {
                            PolicyBody { idx }
                        }
                    } else {
                        CardContent {
                            Collapsible { title: section.title.to_string(),
                                PolicyBody { idx }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PolicyBody(idx: usize) -> Element {
    let Some(section) = POLICY.get(idx) else {
        return rsx! {};
    };
    rsx! {
        for text in section.paragraphs.iter() {
            p { class: "view-muted", "{text}" }
        }
        if !section.bullets.is_empty() {
            ul { class: "policy-list",
                for item in section.bullets.iter() {
                    li { "{item}" }
                }
            }
        }
    }
}
