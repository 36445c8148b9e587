//! Sign-in screen.
//!
//! The backend offers a single sign-in flow. The Google, Apple and mobile
//! buttons run their client-side steps (the mobile dialog validates the phone
//! number and passcode) and then hand over to that flow with a notice.

use std::time::Duration;

use dioxus::prelude::*;
use store::forms::{OtpCode, PhoneNumber, DEFAULT_OTP_LENGTH};
use store::otp::OtpEntry;

use crate::components::{
    Button, ButtonSize, ButtonVariant, Dialog, Input, Label, OtpInput, Spinner,
};
use crate::icons::{FaApple, FaComment, FaGoogle, FaLocationDot, FaMobileScreen, FaShield};
use crate::{platform, use_notifier, use_session_client, Icon};

const PROVIDER_DELAY: Duration = Duration::from_millis(1500);
const OTP_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OtpStep {
    Phone,
    Verify,
}

#[component]
pub fn LoginScreen(on_privacy: EventHandler<()>) -> Element {
    let client = use_session_client();
    let mut notifier = use_notifier();
    let mut processing = use_signal(|| false);
    let mut signing_in = use_signal(|| false);
    let mut show_mobile = use_signal(|| false);

    let login_url = client.login_url();
    let sign_in = use_callback(move |_: ()| {
        signing_in.set(true);
        tracing::info!("redirecting to sign-in");
        platform::redirect(&login_url);
    });

    let provider_sign_in = move |provider: &'static str| {
        spawn(async move {
            processing.set(true);
            platform::sleep(PROVIDER_DELAY).await;
            notifier.info(&format!(
                "{provider} Sign-In is not yet configured. Using the standard sign-in instead."
            ));
            processing.set(false);
            sign_in.call(());
        });
    };

    let busy = processing() || signing_in();

    rsx! {
        div { class: "login-screen",
            div { class: "login-brand",
                Icon { icon: FaShield, width: 72, height: 72 }
                h1 { "SafeRide" }
                p { class: "view-muted", "Safe & Reliable School Transportation" }
            }

            div { class: "login-buttons",
                Button {
                    variant: ButtonVariant::Outline,
                    size: ButtonSize::Large,
                    class: "w-full",
                    disabled: busy,
                    onclick: move |_| provider_sign_in("Google"),
                    Icon { icon: FaGoogle, width: 18, height: 18 }
                    " Sign in with Google"
                }
                Button {
                    variant: ButtonVariant::Outline,
                    size: ButtonSize::Large,
                    class: "w-full",
                    disabled: busy,
                    onclick: move |_| provider_sign_in("Apple"),
                    Icon { icon: FaApple, width: 18, height: 18 }
                    " Sign in with Apple"
                }
                Button {
                    variant: ButtonVariant::Outline,
                    size: ButtonSize::Large,
                    class: "w-full",
                    disabled: busy,
                    onclick: move |_| show_mobile.set(true),
                    Icon { icon: FaMobileScreen, width: 18, height: 18 }
                    " Sign in with Mobile Number"
                }
                div { class: "login-divider", span { "Or" } }
                Button {
                    size: ButtonSize::Large,
                    class: "w-full",
                    disabled: busy,
                    onclick: move |_| sign_in.call(()),
                    if signing_in() {
                        Spinner { label: "Logging in..." }
                    } else {
                        Icon { icon: FaShield, width: 18, height: 18 }
                        " Sign in"
                    }
                }
            }

            div { class: "login-features",
                Feature {
                    title: "Safe & Secure",
                    text: "Real-time tracking and emergency alerts for peace of mind",
                    Icon { icon: FaShield, width: 20, height: 20 }
                }
                Feature {
                    title: "Live GPS Tracking",
                    text: "Track your child's journey from pickup to drop-off",
                    Icon { icon: FaLocationDot, width: 20, height: 20 }
                }
                Feature {
                    title: "Direct Communication",
                    text: "Chat with drivers and receive instant notifications",
                    Icon { icon: FaComment, width: 20, height: 20 }
                }
            }

            button {
                class: "link-button",
                onclick: move |_| on_privacy.call(()),
                "View Privacy Policy"
            }

            if show_mobile() {
                MobileSignInDialog {
                    on_close: move |_| show_mobile.set(false),
                    on_verified: move |_| {
                        show_mobile.set(false);
                        sign_in.call(());
                    },
                }
            }
        }
    }
}

#[component]
fn Feature(title: String, text: String, children: Element) -> Element {
    rsx! {
        div { class: "login-feature",
            span { class: "login-feature-icon", {children} }
            div {
                p { class: "login-feature-title", "{title}" }
                p { class: "view-muted", "{text}" }
            }
        }
    }
}

/// Phone number then passcode, both checked before anything leaves the page.
#[component]
fn MobileSignInDialog(on_close: EventHandler<()>, on_verified: EventHandler<()>) -> Element {
    let mut notifier = use_notifier();
    let mut step = use_signal(|| OtpStep::Phone);
    let mut phone = use_signal(String::new);
    let mut otp = use_signal(|| OtpEntry::new(DEFAULT_OTP_LENGTH));
    let mut processing = use_signal(|| false);

    let send_otp = move |_| {
        let number = match PhoneNumber::parse(&phone()) {
            Ok(number) => number,
            Err(e) => {
                notifier.error(&e.to_string());
                return;
            }
        };
        spawn(async move {
            processing.set(true);
            platform::sleep(OTP_DELAY).await;
            tracing::debug!(phone = number.as_str(), "passcode requested");
            notifier.success("OTP sent to your phone");
            step.set(OtpStep::Verify);
            processing.set(false);
        });
    };

    let verify_otp = move |_| {
        if let Err(e) = OtpCode::parse(otp().value(), DEFAULT_OTP_LENGTH) {
            notifier.error(&e.to_string());
            return;
        }
        spawn(async move {
            processing.set(true);
            platform::sleep(OTP_DELAY).await;
            notifier.info("Mobile authentication is not yet configured. Using the standard sign-in instead.");
            processing.set(false);
            on_verified.call(());
        });
    };

    let close = move |_| {
        if !processing() {
            on_close.call(());
        }
    };

    let (title, description) = match step() {
        OtpStep::Phone => (
            "Enter Mobile Number".to_string(),
            "Enter your mobile number to receive a verification code".to_string(),
        ),
        OtpStep::Verify => (
            "Verify OTP".to_string(),
            format!("Enter the {DEFAULT_OTP_LENGTH}-digit code sent to {}", phone()),
        ),
    };

    rsx! {
        Dialog { title, description, on_close: close,
            match step() {
                OtpStep::Phone => rsx! {
                    div { class: "form-stack",
                        div { class: "form-field",
                            Label { html_for: "phone", "Mobile Number" }
                            Input {
                                id: "phone",
                                r#type: "tel",
                                placeholder: "+1 (555) 000-0000",
                                value: phone(),
                                disabled: processing(),
                                oninput: move |evt: FormEvent| phone.set(evt.value()),
                            }
                        }
                        Button { class: "w-full", disabled: processing(), onclick: send_otp,
                            if processing() { Spinner { label: "Sending..." } } else { "Send OTP" }
                        }
                    }
                },
                OtpStep::Verify => rsx! {
                    div { class: "form-stack",
                        div { class: "form-field",
                            Label { html_for: "otp", "Verification Code" }
                            OtpInput {
                                entry: otp(),
                                on_change: move |entry| otp.set(entry),
                            }
                        }
                        Button {
                            class: "w-full",
                            disabled: processing() || !otp().is_complete(),
                            onclick: verify_otp,
                            if processing() { Spinner { label: "Verifying..." } } else { "Verify & Continue" }
                        }
                        Button {
                            variant: ButtonVariant::Ghost,
                            class: "w-full",
                            disabled: processing(),
                            onclick: move |_| {
                                otp.set(OtpEntry::new(DEFAULT_OTP_LENGTH));
                                step.set(OtpStep::Phone);
                            },
                            "Change Number"
                        }
                    }
                },
            }
        }
    }
}
