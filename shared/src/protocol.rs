//! 远端 API 协议定义
//!
//! 请求/响应载荷与端点表。路径均相对于 `API_PREFIX`，不带前导 `/`。

use crate::{Dificultad, Rol, TipoEjercicio};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// URL 组件编码集（保留 RFC 3986 unreserved 字符）
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<Rol>,
}

/// 登录凭据，以表单编码发送
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    /// `application/x-www-form-urlencoded` 请求体
    pub fn to_form_body(&self) -> String {
        encode_pairs(&[
            ("username", Some(self.username.as_str())),
            ("password", Some(self.password.as_str())),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

// =========================================================
// 创建 / 更新载荷
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MateriaCreate {
    pub id: String,
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orden: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MateriaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orden: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnidadCreate {
    pub id_materia: String,
    pub numero: u32,
    pub titulo: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnidadUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContenidoCreate {
    pub tema_id: String,
    pub nombre_tema: String,
    pub texto_markdown: String,
    pub id_unidad: String,
    pub id_materia: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContenidoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_tema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texto_markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EjercicioCreate {
    pub tema_id: String,
    pub enunciado: String,
    pub respuesta_correcta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<TipoEjercicio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opciones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dificultad: Option<Dificultad>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EjercicioUpdate {
    /// 改挂到其他主题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tema_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enunciado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respuesta_correcta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<TipoEjercicio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opciones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dificultad: Option<Dificultad>,
}

// =========================================================
// 统计 / 计数 / AI
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Estadisticas {
    #[serde(default)]
    pub total_usuarios: u64,
    #[serde(default)]
    pub total_admins: u64,
    #[serde(default)]
    pub total_materias: u64,
    #[serde(default)]
    pub total_unidades: u64,
    #[serde(default)]
    pub total_contenidos: u64,
    #[serde(default)]
    pub total_ejercicios: u64,
}

/// 计数响应，例如 `{"total_contenidos": 2, "unidad_id": "u1"}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conteo(pub HashMap<String, serde_json::Value>);

impl Conteo {
    /// 读取 `total_<resource>` 字段
    pub fn total(&self, resource: CountResource) -> Option<u64> {
        self.0.get(resource.total_key()).and_then(|v| v.as_u64())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConsulta {
    pub pregunta: String,
    pub tema_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRespuesta {
    pub respuesta: String,
    #[serde(default)]
    pub contexto_usado_del_tema: String,
}

// =========================================================
// 过滤条件 (Filters)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContenidoFilter {
    pub unidad_id: Option<String>,
    pub materia_id: Option<String>,
}

impl ContenidoFilter {
    pub fn por_unidad(unidad_id: impl Into<String>) -> Self {
        Self {
            unidad_id: Some(unidad_id.into()),
            materia_id: None,
        }
    }

    fn query(&self) -> String {
        encode_pairs(&[
            ("unidad_id", self.unidad_id.as_deref()),
            ("materia_id", self.materia_id.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EjercicioFilter {
    pub tema_id: Option<String>,
    pub tipo: Option<TipoEjercicio>,
    pub dificultad: Option<Dificultad>,
}

impl EjercicioFilter {
    fn query(&self) -> String {
        encode_pairs(&[
            ("tema_id", self.tema_id.as_deref()),
            ("tipo", self.tipo.map(|t| t.as_str())),
            ("dificultad", self.dificultad.map(|d| d.as_str())),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountResource {
    Materias,
    Unidades,
    Contenidos,
    Ejercicios,
}

impl CountResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountResource::Materias => "materias",
            CountResource::Unidades => "unidades",
            CountResource::Contenidos => "contenidos",
            CountResource::Ejercicios => "ejercicios",
        }
    }

    pub fn total_key(&self) -> &'static str {
        match self {
            CountResource::Materias => "total_materias",
            CountResource::Unidades => "total_unidades",
            CountResource::Contenidos => "total_contenidos",
            CountResource::Ejercicios => "total_ejercicios",
        }
    }
}

/// 计数查询及其可选过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountQuery {
    Materias,
    Unidades { materia_id: Option<String> },
    Contenidos(ContenidoFilter),
    Ejercicios(EjercicioFilter),
}

impl CountQuery {
    pub fn resource(&self) -> CountResource {
        match self {
            CountQuery::Materias => CountResource::Materias,
            CountQuery::Unidades { .. } => CountResource::Unidades,
            CountQuery::Contenidos(_) => CountResource::Contenidos,
            CountQuery::Ejercicios(_) => CountResource::Ejercicios,
        }
    }

    fn query(&self) -> String {
        match self {
            CountQuery::Materias => String::new(),
            CountQuery::Unidades { materia_id } => {
                encode_pairs(&[("materia_id", materia_id.as_deref())])
            }
            CountQuery::Contenidos(filter) => filter.query(),
            CountQuery::Ejercicios(filter) => filter.query(),
        }
    }
}

// =========================================================
// 端点表 (Endpoints)
// =========================================================

/// 远端 API 的全部端点
///
/// 同一资源路径可能对应多个 HTTP 方法（例如 `AdminMateria` 的 GET/PUT/DELETE），
/// 方法由调用方决定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    // --- 公开 ---
    Register,
    Login,
    Saludo,
    Materias,
    UnidadesDeMateria(String),
    Unidades,
    TemaContenido(String),
    AiConsulta,

    // --- 管理：学科 ---
    AdminMaterias,
    AdminMateria(String),

    // --- 管理：单元 ---
    AdminUnidades,
    AdminUnidad(String),
    AdminUnidadesDeMateria(String),

    // --- 管理：内容（创建与删除使用单数路径） ---
    AdminContenidoCreate,
    AdminContenidos(ContenidoFilter),
    AdminContenido(String),
    AdminContenidoDelete(String),

    // --- 管理：练习 ---
    AdminEjercicios,
    AdminEjercicio(String),
    AdminEjercicioDetalle(String),
    AdminEjerciciosPorTema(String),
    AdminEjerciciosPorTipo(TipoEjercicio),
    AdminEjerciciosPorDificultad(Dificultad),

    // --- 管理：统计 ---
    Count(CountQuery),
    Estadisticas,
}

impl Endpoint {
    /// 相对路径（含查询串）
    pub fn path(&self) -> String {
        match self {
            Endpoint::Register => "auth/register".to_string(),
            Endpoint::Login => "auth/login".to_string(),
            Endpoint::Saludo => "saludo".to_string(),
            Endpoint::Materias => "materias".to_string(),
            Endpoint::UnidadesDeMateria(id) => format!("materias/{}/unidades", segment(id)),
            Endpoint::Unidades => "unidades".to_string(),
            Endpoint::TemaContenido(tema_id) => format!("contenido/tema/{}", segment(tema_id)),
            Endpoint::AiConsulta => "ai/consulta".to_string(),

            Endpoint::AdminMaterias => "admin/materias".to_string(),
            Endpoint::AdminMateria(id) => format!("admin/materias/{}", segment(id)),

            Endpoint::AdminUnidades => "admin/unidades".to_string(),
            Endpoint::AdminUnidad(id) => format!("admin/unidades/{}", segment(id)),
            Endpoint::AdminUnidadesDeMateria(id) => {
                format!("admin/unidades/materia/{}", segment(id))
            }

            Endpoint::AdminContenidoCreate => "admin/contenido".to_string(),
            Endpoint::AdminContenidos(filter) => with_query("admin/contenidos", &filter.query()),
            Endpoint::AdminContenido(tema_id) => format!("admin/contenidos/{}", segment(tema_id)),
            Endpoint::AdminContenidoDelete(tema_id) => {
                format!("admin/contenido/{}", segment(tema_id))
            }

            Endpoint::AdminEjercicios => "admin/ejercicios".to_string(),
            Endpoint::AdminEjercicio(id) => format!("admin/ejercicios/{}", segment(id)),
            Endpoint::AdminEjercicioDetalle(id) => {
                format!("admin/ejercicios/ejercicio/{}", segment(id))
            }
            Endpoint::AdminEjerciciosPorTema(tema_id) => {
                format!("admin/ejercicios/tema/{}", segment(tema_id))
            }
            Endpoint::AdminEjerciciosPorTipo(tipo) => format!("admin/ejercicios/tipo/{}", tipo),
            Endpoint::AdminEjerciciosPorDificultad(d) => {
                format!("admin/ejercicios/dificultad/{}", d)
            }

            Endpoint::Count(query) => with_query(
                &format!("admin/count/{}", query.resource().as_str()),
                &query.query(),
            ),
            Endpoint::Estadisticas => "admin/estadisticas".to_string(),
        }
    }
}

// =========================================================
// 编码工具
// =========================================================

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// 编码键值对，跳过值为 `None` 或空串的项
fn encode_pairs(pairs: &[(&str, Option<&str>)]) -> String {
    pairs
        .iter()
        .filter_map(|(k, v)| v.filter(|v| !v.is_empty()).map(|v| (k, v)))
        .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, COMPONENT)))
        .collect::<Vec<_>>()
        .join("&")
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}
