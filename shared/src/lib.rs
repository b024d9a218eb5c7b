//! EduWeb 共享类型
//!
//! 管理前端与远端 API 之间的领域模型（materia / unidad / contenido / ejercicio）
//! 以及协议定义（见 [`protocol`]）。

pub mod date;
pub mod protocol;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中保存 Bearer Token 的键
pub const TOKEN_STORAGE_KEY: &str = "access_token";
/// API 路径前缀
pub const API_PREFIX: &str = "/api/v1/";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// 内容加载失败时占位记录的描述
pub const UNAVAILABLE_DESCRIPTION: &str = "Error al cargar contenido desde el servidor";

// =========================================================
// 枚举 (Enumerations)
// =========================================================

/// 练习题类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoEjercicio {
    #[default]
    MultipleChoice,
    VerdaderoFalso,
    TextoLibre,
    Completar,
}

impl TipoEjercicio {
    pub const ALL: [TipoEjercicio; 4] = [
        TipoEjercicio::MultipleChoice,
        TipoEjercicio::VerdaderoFalso,
        TipoEjercicio::TextoLibre,
        TipoEjercicio::Completar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TipoEjercicio::MultipleChoice => "multiple_choice",
            TipoEjercicio::VerdaderoFalso => "verdadero_falso",
            TipoEjercicio::TextoLibre => "texto_libre",
            TipoEjercicio::Completar => "completar",
        }
    }

    /// UI 显示名称
    pub fn label(&self) -> &'static str {
        match self {
            TipoEjercicio::MultipleChoice => "Opción múltiple",
            TipoEjercicio::VerdaderoFalso => "Verdadero / Falso",
            TipoEjercicio::TextoLibre => "Texto libre",
            TipoEjercicio::Completar => "Completar",
        }
    }

    /// 该类型是否使用 `opciones`
    pub fn uses_options(&self) -> bool {
        matches!(self, TipoEjercicio::MultipleChoice)
    }
}

/// 练习题难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dificultad {
    #[default]
    Principiante,
    Intermedio,
    Avanzado,
}

impl Dificultad {
    pub const ALL: [Dificultad; 3] = [
        Dificultad::Principiante,
        Dificultad::Intermedio,
        Dificultad::Avanzado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dificultad::Principiante => "principiante",
            Dificultad::Intermedio => "intermedio",
            Dificultad::Avanzado => "avanzado",
        }
    }
}

/// 注册时的用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    #[default]
    Alumno,
    Admin,
}

impl Rol {
    pub const ALL: [Rol; 2] = [Rol::Alumno, Rol::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Alumno => "alumno",
            Rol::Admin => "admin",
        }
    }
}

macro_rules! impl_str_enum {
    ($ty:ty, $name:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == value.trim())
                    .ok_or_else(|| format!("{} inválido: {}", $name, value))
            }
        }
    };
}

impl_str_enum!(TipoEjercicio, "tipo");
impl_str_enum!(Dificultad, "dificultad");
impl_str_enum!(Rol, "rol");

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 学科，层级的根节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Materia {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub orden: u32,
}

impl Materia {
    pub fn new(id: impl Into<String>, nombre: impl Into<String>, orden: u32) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
            orden,
        }
    }

    /// 顶层加载失败时展示的固定占位学科
    pub fn placeholders() -> Vec<Materia> {
        vec![
            Materia::new("1", "Matemáticas", 1),
            Materia::new("2", "Programación", 2),
            Materia::new("3", "Base de Datos", 3),
        ]
    }
}

/// 单元，隶属于某个学科
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Unidad {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 旧版文档 ID
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
    #[serde(default)]
    pub id_materia: String,
    #[serde(default)]
    pub numero: u32,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
}

impl Unidad {
    /// 服务端分配的 ID（空字符串视为缺失）
    pub fn id(&self) -> Option<&str> {
        non_blank(self.id.as_deref())
    }

    /// 解析用于加载内容的单元标识（兼容层）
    ///
    /// 依次尝试 `id` → `_id` → `numero` → `titulo`。
    /// 后两者并不是真正的标识符，只是为了兼容缺少 ID 的旧数据；
    /// 服务端若按它们过滤，结果可能与预期不同。
    pub fn resolve_key(&self) -> Option<String> {
        self.id()
            .or_else(|| non_blank(self.legacy_id.as_deref()))
            .map(str::to_string)
            .or_else(|| (self.numero > 0).then(|| self.numero.to_string()))
            .or_else(|| non_blank(Some(&self.titulo)).map(str::to_string))
    }
}

/// 内容主题，隶属于某个单元
///
/// 规范标识为 `tema_id`；`id` 仅在旧记录缺少 `tema_id` 时作为回退。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contenido {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tema_id: String,
    #[serde(default)]
    pub nombre_tema: String,
    #[serde(default)]
    pub texto_markdown: String,
    #[serde(default)]
    pub id_unidad: String,
    #[serde(default)]
    pub id_materia: String,
    #[serde(default)]
    pub numero: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

impl Contenido {
    /// 主题的规范键
    pub fn key(&self) -> &str {
        if self.tema_id.trim().is_empty() {
            &self.id
        } else {
            &self.tema_id
        }
    }

    /// 列表加载失败但计数非零时合成的占位记录
    pub fn unavailable(unidad_key: &str) -> Self {
        Self {
            id: "1".to_string(),
            tema_id: "1".to_string(),
            nombre_tema: "Contenido no disponible".to_string(),
            numero: 1,
            descripcion: Some(UNAVAILABLE_DESCRIPTION.to_string()),
            id_unidad: unidad_key.to_string(),
            ..Default::default()
        }
    }
}

/// 练习题，隶属于某个内容主题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ejercicio {
    #[serde(default)]
    pub id: String,
    pub tema_id: String,
    pub enunciado: String,
    /// 仅管理员可见
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respuesta_correcta: Option<String>,
    #[serde(default)]
    pub tipo: TipoEjercicio,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opciones: Option<Vec<String>>,
    #[serde(default)]
    pub dificultad: Dificultad,
    #[serde(
        default,
        deserialize_with = "date::lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub fecha_creacion: Option<DateTime<Utc>>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
