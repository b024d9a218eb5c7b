//! 远端 API 网关
//!
//! 每个端点一个方法。所有请求经过 [`AuthInterceptor`]，非 2xx 响应转换为
//! `ApiError::http` 并附带操作名。

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::interceptor::AuthInterceptor;
use crate::session::SessionStore;
use crate::web::http::{FetchHttpClient, HttpClient, HttpRequest, HttpResponse};
use crate::web::storage::{BrowserStorage, KeyValueStore};
use eduweb_shared::protocol::{
    AiConsulta, AiRespuesta, ContenidoCreate, ContenidoFilter, ContenidoUpdate, Conteo,
    CountQuery, EjercicioCreate, EjercicioUpdate, Endpoint, Estadisticas, HttpMethod,
    LoginCredentials, MateriaCreate, MateriaUpdate, Token, UnidadCreate, UnidadUpdate, UserCreate,
};
use eduweb_shared::{
    CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, Contenido, Dificultad, Ejercicio, HEADER_CONTENT_TYPE,
    Materia, TipoEjercicio, Unidad,
};
use leptos::logging::{log, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;

/// 浏览器环境下的 API 客户端
pub type BrowserApi = ApiClient<FetchHttpClient, BrowserStorage>;

pub struct ApiClient<C, S> {
    config: Rc<AppConfig>,
    client: Rc<C>,
    interceptor: AuthInterceptor<S>,
}

impl<C, S> Clone for ApiClient<C, S> {
    fn clone(&self) -> Self {
        Self {
            config: Rc::clone(&self.config),
            client: Rc::clone(&self.client),
            interceptor: self.interceptor.clone(),
        }
    }
}

impl BrowserApi {
    pub fn browser(config: AppConfig) -> Self {
        Self::new(
            config,
            Rc::new(FetchHttpClient),
            SessionStore::new(BrowserStorage),
        )
    }
}

impl<C: HttpClient, S: KeyValueStore> ApiClient<C, S> {
    pub fn new(config: AppConfig, client: Rc<C>, session: SessionStore<S>) -> Self {
        Self {
            config: Rc::new(config),
            client,
            interceptor: AuthInterceptor::new(session),
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        self.interceptor.session()
    }

    // =========================================================
    // 请求管线
    // =========================================================

    async fn execute(
        &self,
        method: HttpMethod,
        endpoint: &Endpoint,
        body: Option<(&str, String)>,
        op: &str,
    ) -> ApiResult<HttpResponse> {
        let url = self.config.url(endpoint);
        let mut request = HttpRequest::new(&url, method);
        if let Some((content_type, body)) = body {
            request = request
                .with_header(HEADER_CONTENT_TYPE, content_type)
                .with_body(body);
        }
        let request = self.interceptor.intercept(request);

        log!("[Api] {} {}", method.as_str(), url);
        let response = self.client.send(request).await.map_err(|e| e.in_op(op))?;

        if !response.ok() {
            let err = ApiError::http(response.status, response.body).in_op_with(op, url);
            warn!("[Api] {}", err);
            return Err(err);
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint, op: &str) -> ApiResult<T> {
        self.execute(HttpMethod::Get, &endpoint, None, op)
            .await?
            .json()
            .map_err(|e| e.in_op(op))
    }

    async fn send_json<B, T>(
        &self,
        method: HttpMethod,
        endpoint: Endpoint,
        payload: &B,
        op: &str,
    ) -> ApiResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::encode(e.to_string()).in_op(op))?;
        self.execute(method, &endpoint, Some((CONTENT_TYPE_JSON, body)), op)
            .await?
            .json()
            .map_err(|e| e.in_op(op))
    }

    async fn delete(&self, endpoint: Endpoint, op: &str) -> ApiResult<()> {
        self.execute(HttpMethod::Delete, &endpoint, None, op)
            .await
            .map(|_| ())
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn register(&self, user: &UserCreate) -> ApiResult<Value> {
        self.send_json(HttpMethod::Post, Endpoint::Register, user, "api.register")
            .await
    }

    /// 表单编码提交凭据
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<Token> {
        let op = "api.login";
        let body = Some((CONTENT_TYPE_FORM, credentials.to_form_body()));
        self.execute(HttpMethod::Post, &Endpoint::Login, body, op)
            .await?
            .json()
            .map_err(|e| e.in_op(op))
    }

    // =========================================================
    // 公开端点
    // =========================================================

    pub async fn saludo(&self) -> ApiResult<Value> {
        self.get(Endpoint::Saludo, "api.saludo").await
    }

    pub async fn materias(&self) -> ApiResult<Vec<Materia>> {
        self.get(Endpoint::Materias, "api.materias").await
    }

    pub async fn unidades_de_materia(&self, materia_id: &str) -> ApiResult<Vec<Unidad>> {
        self.get(
            Endpoint::UnidadesDeMateria(materia_id.to_string()),
            "api.unidades_de_materia",
        )
        .await
    }

    pub async fn unidades(&self) -> ApiResult<Vec<Unidad>> {
        self.get(Endpoint::Unidades, "api.unidades").await
    }

    pub async fn tema_contenido(&self, tema_id: &str) -> ApiResult<Contenido> {
        self.get(
            Endpoint::TemaContenido(tema_id.to_string()),
            "api.tema_contenido",
        )
        .await
    }

    pub async fn consulta_ai(&self, consulta: &AiConsulta) -> ApiResult<AiRespuesta> {
        self.send_json(HttpMethod::Post, Endpoint::AiConsulta, consulta, "api.consulta_ai")
            .await
    }

    // =========================================================
    // 管理：学科
    // =========================================================

    pub async fn create_materia(&self, materia: &MateriaCreate) -> ApiResult<Value> {
        self.send_json(
            HttpMethod::Post,
            Endpoint::AdminMaterias,
            materia,
            "api.create_materia",
        )
        .await
    }

    pub async fn list_materias(&self) -> ApiResult<Vec<Materia>> {
        self.get(Endpoint::AdminMaterias, "api.list_materias").await
    }

    pub async fn get_materia(&self, id: &str) -> ApiResult<Materia> {
        self.get(Endpoint::AdminMateria(id.to_string()), "api.get_materia")
            .await
    }

    pub async fn update_materia(&self, id: &str, update: &MateriaUpdate) -> ApiResult<Value> {
        self.send_json(
            HttpMethod::Put,
            Endpoint::AdminMateria(id.to_string()),
            update,
            "api.update_materia",
        )
        .await
    }

    pub async fn delete_materia(&self, id: &str) -> ApiResult<()> {
        self.delete(Endpoint::AdminMateria(id.to_string()), "api.delete_materia")
            .await
    }

    // =========================================================
    // 管理：单元
    // =========================================================

    pub async fn create_unidad(&self, unidad: &UnidadCreate) -> ApiResult<Value> {
        self.send_json(
            HttpMethod::Post,
            Endpoint::AdminUnidades,
            unidad,
            "api.create_unidad",
        )
        .await
    }

    pub async fn list_unidades(&self) -> ApiResult<Vec<Unidad>> {
        self.get(Endpoint::AdminUnidades, "api.list_unidades").await
    }

    pub async fn get_unidad(&self, id: &str) -> ApiResult<Unidad> {
        self.get(Endpoint::AdminUnidad(id.to_string()), "api.get_unidad")
            .await
    }

    pub async fn list_unidades_de_materia(&self, materia_id: &str) -> ApiResult<Vec<Unidad>> {
        self.get(
            Endpoint::AdminUnidadesDeMateria(materia_id.to_string()),
            "api.list_unidades_de_materia",
        )
        .await
    }

    pub async fn update_unidad(&self, id: &str, update: &UnidadUpdate) -> ApiResult<Value> {
        self.send_json(
            HttpMethod::Put,
            Endpoint::AdminUnidad(id.to_string()),
            update,
            "api.update_unidad",
        )
        .await
    }

    pub async fn delete_unidad(&self, id: &str) -> ApiResult<()> {
        self.delete(Endpoint::AdminUnidad(id.to_string()), "api.delete_unidad")
            .await
    }

    // =========================================================
    // 管理：内容
    // =========================================================

    pub async fn create_contenido(&self, contenido: &ContenidoCreate) -> ApiResult<Value> {
        self.send_json(
            HttpMethod::Post,
            Endpoint::AdminContenidoCreate,
            contenido,
            "api.create_contenido",
        )
        .await
    }

    pub async fn list_contenidos(&self, filter: ContenidoFilter) -> ApiResult<Vec<Contenido>> {
        self.get(Endpoint::AdminContenidos(filter), "api.list_contenidos")
            .await
    }

    pub async fn get_contenido(&self, tema_id: &str) -> ApiResult<Contenido> {
        self.get(
            Endpoint::AdminContenido(tema_id.to_string()),
            "api.get_contenido",
        )
        .await
    }

    pub async fn update_contenido(
        &self,
        tema_id: &str,
        update: &ContenidoUpdate,
    ) -> ApiResult<Value> {
        self.send_json(
            HttpMethod::Put,
            Endpoint::AdminContenido(tema_id.to_string()),
            update,
            "api.update_contenido",
        )
        .await
    }

    pub async fn delete_contenido(&self, tema_id: &str) -> ApiResult<()> {
        self.delete(
            Endpoint::AdminContenidoDelete(tema_id.to_string()),
            "api.delete_contenido",
        )
        .await
    }

    // =========================================================
    // 管理：练习
    // =========================================================

    pub async fn create_ejercicio(&self, ejercicio: &EjercicioCreate) -> ApiResult<Value> {
        self.send_json(
            HttpMethod::Post,
            Endpoint::AdminEjercicios,
            ejercicio,
            "api.create_ejercicio",
        )
        .await
    }

    pub async fn list_ejercicios(&self) -> ApiResult<Vec<Ejercicio>> {
        self.get(Endpoint::AdminEjercicios, "api.list_ejercicios")
            .await
    }

    pub async fn get_ejercicio(&self, id: &str) -> ApiResult<Ejercicio> {
        self.get(
            Endpoint::AdminEjercicioDetalle(id.to_string()),
            "api.get_ejercicio",
        )
        .await
    }

    pub async fn ejercicios_por_tema(&self, tema_id: &str) -> ApiResult<Vec<Ejercicio>> {
        self.get(
            Endpoint::AdminEjerciciosPorTema(tema_id.to_string()),
            "api.ejercicios_por_tema",
        )
        .await
    }

    pub async fn ejercicios_por_tipo(&self, tipo: TipoEjercicio) -> ApiResult<Vec<Ejercicio>> {
        self.get(
            Endpoint::AdminEjerciciosPorTipo(tipo),
            "api.ejercicios_por_tipo",
        )
        .await
    }

    pub async fn ejercicios_por_dificultad(
        &self,
        dificultad: Dificultad,
    ) -> ApiResult<Vec<Ejercicio>> {
        self.get(
            Endpoint::AdminEjerciciosPorDificultad(dificultad),
            "api.ejercicios_por_dificultad",
        )
        .await
    }

    pub async fn update_ejercicio(&self, id: &str, update: &EjercicioUpdate) -> ApiResult<Value> {
        self.send_json(
            HttpMethod::Put,
            Endpoint::AdminEjercicio(id.to_string()),
            update,
            "api.update_ejercicio",
        )
        .await
    }

    pub async fn delete_ejercicio(&self, id: &str) -> ApiResult<()> {
        self.delete(
            Endpoint::AdminEjercicio(id.to_string()),
            "api.delete_ejercicio",
        )
        .await
    }

    // =========================================================
    // 管理：统计
    // =========================================================

    pub async fn count(&self, query: CountQuery) -> ApiResult<Conteo> {
        self.get(Endpoint::Count(query), "api.count").await
    }

    pub async fn estadisticas(&self) -> ApiResult<Estadisticas> {
        self.get(Endpoint::Estadisticas, "api.estadisticas").await
    }
}
