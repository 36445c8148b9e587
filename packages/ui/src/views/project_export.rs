use std::time::Duration;

use dioxus::prelude::*;

use crate::components::{
    Alert, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader,
    CardTitle, Label,
};
use crate::icons::{FaArrowUpRightFromSquare, FaCheck, FaCircleCheck, FaCopy, FaDownload};
use crate::notifications::NoticeLevel;
use crate::platform::{copy_to_clipboard, page_origin, sleep};
use crate::{use_notifier, Icon};

const BUNDLE_PATH: &str = "/api/project-bundle.zip";
const COPIED_FOR: Duration = Duration::from_secs(2);
const GENERATE_DELAY: Duration = Duration::from_secs(2);

const CONTENTS: [&str; 5] = [
    "Backend service sources",
    "Client crates and components",
    "Configuration files (Cargo.toml, saferide.toml, Dioxus.toml)",
    "Asset files (styles, icons, generated content)",
    "Documentation and README files",
];

const LAYOUT: &str = "project-bundle.zip
├── backend/
├── packages/
│   ├── api/
│   ├── store/
│   ├── ui/
│   └── web/
├── Cargo.toml
└── README.md";

/// Download link for the project source bundle served by the backend.
pub fn bundle_link(origin: &str) -> String {
    format!("{}{BUNDLE_PATH}", origin.trim_end_matches('/'))
}

#[component]
pub fn ProjectExport() -> Element {
    let mut notifier = use_notifier();
    let mut copied = use_signal(|| false);
    let mut generating = use_signal(|| false);
    let link = use_hook(|| bundle_link(&page_origin()));

    let copy = {
        let link = link.clone();
        move |_| {
            let link = link.clone();
            spawn(async move {
                match copy_to_clipboard(&link).await {
                    Ok(()) => {
                        copied.set(true);
                        notifier.detailed(
                            NoticeLevel::Success,
                            "Link Copied",
                            "Download link copied to clipboard.",
                        );
                        sleep(COPIED_FOR).await;
                        copied.set(false);
                    }
                    Err(e) => {
                        tracing::warn!("Clipboard write failed: {e}");
                        notifier.error("Could not copy the link");
                    }
                }
            });
        }
    };

    let download = move |_| {
        if generating() {
            return;
        }
        generating.set(true);
        notifier.detailed(
            NoticeLevel::Info,
            "Generating Project Bundle",
            "Creating ZIP archive with all project files...",
        );
        spawn(async move {
            sleep(GENERATE_DELAY).await;
            generating.set(false);
            notifier.detailed(
                NoticeLevel::Success,
                "Download Ready",
                "Your project bundle is ready for download.",
            );
        });
    };

    rsx! {
        Card {
            CardHeader {
                CardTitle { "Download Project Bundle" }
                CardDescription {
                    "Export all project source files including client crates, backend sources, assets, and configuration files as a ZIP archive."
                }
            }
            CardContent { class: "form-stack",
                div { class: "export-panel",
                    h3 { "Bundle Contents:" }
                    ul { class: "export-contents",
                        for item in CONTENTS {
                            li { key: "{item}",
                                Icon { icon: FaCircleCheck, width: 14, height: 14 }
                                span { "{item}" }
                            }
                        }
                    }
                }
                Alert { title: "Direct Download Access",
                    "Use the direct download link below to access the complete project bundle."
                }
                Button {
                    size: ButtonSize::Large,
                    class: "w-full",
                    disabled: generating(),
                    onclick: download,
                    Icon { icon: FaDownload, width: 16, height: 16 }
                    if generating() { " Generating Bundle..." } else { " Download Project Bundle" }
                }
                div { class: "export-link",
                    Label { "Direct Download Link:" }
                    div { class: "export-link-row",
                        input { class: "input", r#type: "text", readonly: true, value: "{link}" }
                        Button { variant: ButtonVariant::Outline, title: "Copy link", onclick: copy,
                            if copied() {
                                Icon { icon: FaCheck, width: 14, height: 14 }
                            } else {
                                Icon { icon: FaCopy, width: 14, height: 14 }
                            }
                        }
                        a {
                            class: "btn btn-outline btn-md",
                            href: "{link}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            title: "Open link",
                            Icon { icon: FaArrowUpRightFromSquare, width: 14, height: 14 }
                        }
                    }
                    p { class: "view-hint", "Share this link to provide access to the complete project source code." }
                }
                Alert { title: "Archive Structure",
                    p { "The downloaded ZIP archive is organized as follows:" }
                    pre { class: "export-layout", "{LAYOUT}" }
                }
            }
        }
    }
}
