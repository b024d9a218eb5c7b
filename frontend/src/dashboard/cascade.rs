use super::{DashboardController, TemaDetalle};
use crate::error::ApiError;
use crate::web::http::HttpClient;
use crate::web::storage::KeyValueStore;
use eduweb_shared::protocol::{ContenidoFilter, CountQuery, CountResource};
use eduweb_shared::{Contenido, Materia, Unidad};
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use std::collections::HashSet;

pub(super) const SESSION_REJECTED: &str = "Sesión no válida: vuelve a iniciar sesión";

impl<C: HttpClient, S: KeyValueStore> DashboardController<C, S> {
    pub(super) fn materia_is_current(&self, generation: u64) -> bool {
        self.read(|s| s.materia_generation == generation)
    }

    pub(super) fn unidad_is_current(&self, generation: u64) -> bool {
        self.read(|s| s.unidad_generation == generation)
    }

    /// 401/403：提示重新登录，列表仍按各自的失败策略处理
    fn notify_if_unauthorized(&self, e: &ApiError) {
        if e.is_unauthorized() {
            warn!("[Dashboard] 会话无效或权限不足: {}", e);
            self.notify(SESSION_REJECTED, true);
        }
    }

    // =========================================================
    // 顶层
    // =========================================================

    /// 加载学科列表；失败时显示固定占位学科
    pub async fn load_materias(&self) {
        self.state.update(|s| s.is_loading = true);
        let result = self.api.materias().await;
        if let Err(e) = &result {
            self.notify_if_unauthorized(e);
        }

        self.state.update(|s| {
            s.is_loading = false;
            match result {
                Ok(list) => s.materias = list,
                Err(e) => {
                    error!("[Dashboard] 加载学科失败，使用占位数据: {}", e);
                    s.materias = Materia::placeholders();
                }
            }
        });
    }

    /// 统计不可用时隐藏统计栏
    pub async fn load_estadisticas(&self) {
        match self.api.estadisticas().await {
            Ok(stats) => self.state.update(|s| s.estadisticas = Some(stats)),
            Err(e) => {
                warn!("[Dashboard] 统计不可用: {}", e);
                self.state.update(|s| s.estadisticas = None);
            }
        }
    }

    // =========================================================
    // 学科 → 单元
    // =========================================================

    pub async fn select_materia(&self, materia: Materia) {
        let materia_id = materia.id.clone();
        self.state.update(|s| {
            s.clear_below_materia();
            s.selected_materia = Some(materia);
        });
        self.load_unidades(&materia_id).await;
    }

    /// 失败时保留现有列表
    pub async fn load_unidades(&self, materia_id: &str) {
        let generation = self.read(|s| s.materia_generation);
        let result = self.api.unidades_de_materia(materia_id).await;

        if !self.materia_is_current(generation) {
            log!("[Dashboard] 丢弃过期的单元响应: {}", materia_id);
            return;
        }
        match result {
            Ok(list) => self.state.update(|s| s.unidades = list),
            Err(e) => {
                self.notify_if_unauthorized(&e);
                error!(
                    "[Dashboard] {}",
                    e.in_op_with("dashboard.load_unidades", materia_id)
                );
            }
        }
    }

    // =========================================================
    // 单元 → 内容 → 练习
    // =========================================================

    pub async fn select_unidad(&self, unidad: Unidad) {
        let key = unidad.resolve_key();
        self.state.update(|s| {
            s.clear_below_unidad();
            s.selected_unidad = Some(unidad);
        });

        match key {
            Some(key) => self.load_contenidos(&key).await,
            None => warn!("[Dashboard] 单元缺少标识，无法加载内容"),
        }
    }

    /// 列表加载失败时以计数接口区分"确实为空"与"暂不可用"
    pub async fn load_contenidos(&self, unidad_key: &str) {
        let generation = self.read(|s| s.unidad_generation);
        let filter = ContenidoFilter::por_unidad(unidad_key);
        let result = self.api.list_contenidos(filter.clone()).await;

        if !self.unidad_is_current(generation) {
            log!("[Dashboard] 丢弃过期的内容响应: {}", unidad_key);
            return;
        }

        match result {
            Ok(list) => {
                self.state.update(|s| s.contenidos = list);
                self.load_ejercicios().await;
            }
            Err(e) => {
                self.notify_if_unauthorized(&e);
                error!(
                    "[Dashboard] {}",
                    e.in_op_with("dashboard.load_contenidos", unidad_key)
                );
                let fallback = self.fallback_contenidos(unidad_key, filter).await;
                if self.unidad_is_current(generation) {
                    self.state.update(|s| s.contenidos = fallback);
                }
            }
        }
    }

    async fn fallback_contenidos(&self, unidad_key: &str, filter: ContenidoFilter) -> Vec<Contenido> {
        match self.api.count(CountQuery::Contenidos(filter)).await {
            Ok(conteo) if conteo.total(CountResource::Contenidos) == Some(0) => Vec::new(),
            Ok(_) => vec![Contenido::unavailable(unidad_key)],
            Err(e) => {
                error!("[Dashboard] 计数失败: {}", e);
                Vec::new()
            }
        }
    }

    /// 拉取全部练习，只保留属于当前内容列表的，保持服务端顺序
    pub async fn load_ejercicios(&self) {
        let generation = self.read(|s| s.unidad_generation);
        let result = self.api.list_ejercicios().await;

        if !self.unidad_is_current(generation) {
            log!("[Dashboard] 丢弃过期的练习响应");
            return;
        }

        self.state.update(|s| match result {
            Ok(all) => {
                let temas: HashSet<&str> = s.contenidos.iter().map(Contenido::key).collect();
                s.ejercicios = all
                    .into_iter()
                    .filter(|e| temas.contains(e.tema_id.as_str()))
                    .collect();
            }
            Err(e) => {
                error!("[Dashboard] 加载练习失败: {}", e);
                s.ejercicios.clear();
            }
        });
    }

    // =========================================================
    // 主题详情
    // =========================================================

    pub async fn view_contenido(&self, contenido: Contenido) {
        let tema_id = contenido.key().to_string();
        self.state.update(|s| {
            s.detalle = Some(TemaDetalle {
                contenido,
                ejercicios: Vec::new(),
                loading: true,
            })
        });

        let result = self.api.ejercicios_por_tema(&tema_id).await;

        self.state.update(|s| {
            // 等待期间可能已关闭或切换到其他主题
            let Some(detalle) = s
                .detalle
                .as_mut()
                .filter(|d| d.contenido.key() == tema_id)
            else {
                return;
            };
            detalle.loading = false;
            match result {
                Ok(list) => detalle.ejercicios = list,
                Err(e) => error!("[Dashboard] 加载主题练习失败: {}", e),
            }
        });
    }

    pub fn close_detalle(&self) {
        self.state.update(|s| s.detalle = None);
    }
}
