//! 管理面板控制器
//!
//! 层级：materia → unidad → contenido → ejercicio。选择上层节点会清空并重新加载下层。
//! 所有状态集中在一个 `ArcRwSignal<DashboardState>` 中，组件只负责渲染与转发事件。
//!
//! - `cascade`: 级联加载与选择
//! - `crud`: 四种资源的表单与增删改

mod cascade;
mod crud;

use crate::api::ApiClient;
use crate::forms::{ContenidoForm, EjercicioForm, FieldErrors, MateriaForm, UnidadForm};
use crate::web::http::{FetchHttpClient, HttpClient};
use crate::web::storage::{BrowserStorage, KeyValueStore};
use eduweb_shared::protocol::Estadisticas;
use eduweb_shared::{Contenido, Ejercicio, Materia, Unidad};
use leptos::prelude::*;
use std::rc::Rc;

// =========================================================
// 状态定义
// =========================================================

/// 横幅通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub is_error: bool,
}

/// 单个资源的表单面板
#[derive(Debug, Clone, PartialEq)]
pub struct FormPanel<F, T> {
    pub visible: bool,
    /// 正在编辑的记录；`None` 表示新建
    pub editing: Option<T>,
    pub values: F,
    pub errors: FieldErrors,
}

impl<F: Default, T> Default for FormPanel<F, T> {
    fn default() -> Self {
        Self {
            visible: false,
            editing: None,
            values: F::default(),
            errors: FieldErrors::new(),
        }
    }
}

impl<F: Default, T> FormPanel<F, T> {
    fn open_create(&mut self, values: F) {
        self.visible = true;
        self.editing = None;
        self.values = values;
        self.errors.clear();
    }

    fn open_edit(&mut self, item: T, values: F) {
        self.visible = true;
        self.editing = Some(item);
        self.values = values;
        self.errors.clear();
    }

    fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn error(&self, field: &str) -> Option<String> {
        self.errors.get(field).cloned()
    }
}

/// 正在查看的主题详情
#[derive(Debug, Clone, PartialEq)]
pub struct TemaDetalle {
    pub contenido: Contenido,
    pub ejercicios: Vec<Ejercicio>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub materias: Vec<Materia>,
    pub unidades: Vec<Unidad>,
    pub contenidos: Vec<Contenido>,
    pub ejercicios: Vec<Ejercicio>,

    pub selected_materia: Option<Materia>,
    pub selected_unidad: Option<Unidad>,

    pub is_loading: bool,
    pub estadisticas: Option<Estadisticas>,
    pub detalle: Option<TemaDetalle>,
    pub notice: Option<Notice>,

    pub materia_form: FormPanel<MateriaForm, Materia>,
    pub unidad_form: FormPanel<UnidadForm, Unidad>,
    pub contenido_form: FormPanel<ContenidoForm, Contenido>,
    pub ejercicio_form: FormPanel<EjercicioForm, Ejercicio>,

    // 选择代数：每次切换选择递增，过期响应据此丢弃
    materia_generation: u64,
    unidad_generation: u64,
    notice_seq: u64,
}

impl DashboardState {
    pub fn is_materia_selected(&self, id: &str) -> bool {
        self.selected_materia.as_ref().is_some_and(|m| m.id == id)
    }

    pub fn is_unidad_selected(&self, unidad: &Unidad) -> bool {
        self.selected_unidad
            .as_ref()
            .is_some_and(|u| u.resolve_key() == unidad.resolve_key())
    }

    fn clear_below_materia(&mut self) {
        self.selected_unidad = None;
        self.unidades.clear();
        self.clear_below_unidad();
        self.materia_generation += 1;
    }

    fn clear_below_unidad(&mut self) {
        self.contenidos.clear();
        self.ejercicios.clear();
        self.detalle = None;
        self.unidad_generation += 1;
    }

    fn push_notice(&mut self, message: impl Into<String>, is_error: bool) {
        self.notice_seq += 1;
        self.notice = Some(Notice {
            id: self.notice_seq,
            message: message.into(),
            is_error,
        });
    }
}

// =========================================================
// 控制器
// =========================================================

/// 删除确认回调，返回 `true` 表示继续
pub type ConfirmFn = Rc<dyn Fn(&str) -> bool>;

pub type BrowserDashboard = DashboardController<FetchHttpClient, BrowserStorage>;

pub struct DashboardController<C, S> {
    api: ApiClient<C, S>,
    state: ArcRwSignal<DashboardState>,
    confirm: ConfirmFn,
}

impl<C, S> Clone for DashboardController<C, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            confirm: Rc::clone(&self.confirm),
        }
    }
}

impl<C: HttpClient, S: KeyValueStore> DashboardController<C, S> {
    pub fn new(api: ApiClient<C, S>, confirm: ConfirmFn) -> Self {
        Self {
            api,
            state: ArcRwSignal::new(DashboardState::default()),
            confirm,
        }
    }

    pub fn state(&self) -> ArcRwSignal<DashboardState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.get_untracked()
    }

    fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        self.state.with_untracked(f)
    }

    fn notify(&self, message: impl Into<String>, is_error: bool) {
        self.state.update(|s| s.push_notice(message, is_error));
    }

    /// 仅当当前通知仍是 `id` 时才清除，避免旧定时器清掉新通知
    pub fn dismiss_notice(&self, id: u64) {
        self.state.update(|s| {
            if s.notice.as_ref().is_some_and(|n| n.id == id) {
                s.notice = None;
            }
        });
    }
}

#[cfg(test)]
mod tests;
