//! 线条图标（Lucide 路径）
//!
//! 组件只渲染一个 `<svg>`，调用方通过 `attr:class` 设置尺寸与颜色。

use leptos::prelude::*;

#[component]
fn Icon(children: Children) -> impl IntoView {
    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
        >
            {children()}
        </svg>
    }
}

#[component]
pub fn GraduationCap() -> impl IntoView {
    view! {
        <Icon>
            <path d="M22 10 12 5 2 10l10 5 10-5z" />
            <path d="M6 12v5c3 3 9 3 12 0v-5" />
        </Icon>
    }
}

#[component]
pub fn LogOut() -> impl IntoView {
    view! {
        <Icon>
            <path d="M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4" />
            <polyline points="16 17 21 12 16 7" />
            <line x1="21" x2="9" y1="12" y2="12" />
        </Icon>
    }
}

#[component]
pub fn Plus() -> impl IntoView {
    view! {
        <Icon>
            <path d="M5 12h14" />
            <path d="M12 5v14" />
        </Icon>
    }
}

#[component]
pub fn Pencil() -> impl IntoView {
    view! {
        <Icon>
            <path d="M17 3a2.85 2.83 0 1 1 4 4L7.5 20.5 2 22l1.5-5.5Z" />
        </Icon>
    }
}

#[component]
pub fn Trash2() -> impl IntoView {
    view! {
        <Icon>
            <path d="M3 6h18" />
            <path d="M19 6v14c0 1-1 2-2 2H7c-1 0-2-1-2-2V6" />
            <path d="M8 6V4c0-1 1-2 2-2h4c1 0 2 1 2 2v2" />
        </Icon>
    }
}

#[component]
pub fn Eye() -> impl IntoView {
    view! {
        <Icon>
            <path d="M2 12s3-7 10-7 10 7 10 7-3 7-10 7-10-7-10-7Z" />
            <circle cx="12" cy="12" r="3" />
        </Icon>
    }
}

#[component]
pub fn EyeOff() -> impl IntoView {
    view! {
        <Icon>
            <path d="M9.88 9.88a3 3 0 1 0 4.24 4.24" />
            <path d="M10.73 5.08A10.43 10.43 0 0 1 12 5c7 0 10 7 10 7a13.16 13.16 0 0 1-1.67 2.68" />
            <path d="M6.61 6.61A13.526 13.526 0 0 0 2 12s3 7 10 7a9.74 9.74 0 0 0 5.39-1.61" />
            <line x1="2" x2="22" y1="2" y2="22" />
        </Icon>
    }
}

#[component]
pub fn BookOpen() -> impl IntoView {
    view! {
        <Icon>
            <path d="M2 3h6a4 4 0 0 1 4 4v14a3 3 0 0 0-3-3H2z" />
            <path d="M22 3h-6a4 4 0 0 0-4 4v14a3 3 0 0 1 3-3h7z" />
        </Icon>
    }
}

#[component]
pub fn X() -> impl IntoView {
    view! {
        <Icon>
            <path d="M18 6 6 18" />
            <path d="m6 6 12 12" />
        </Icon>
    }
}
