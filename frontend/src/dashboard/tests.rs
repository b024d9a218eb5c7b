use super::*;
use crate::api::tests::{test_api, url};
use crate::web::http::MockHttpClient;
use crate::web::storage::MemoryStorage;
use eduweb_shared::UNAVAILABLE_DESCRIPTION;
use eduweb_shared::protocol::HttpMethod;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::time::Duration;

// =========================================================
// 辅助函数
// =========================================================

type TestDashboard = DashboardController<MockHttpClient, MemoryStorage>;

/// `answer` 为确认框的固定回答；返回值第三项记录所有确认提示
fn create_dashboard(answer: bool) -> (Rc<MockHttpClient>, TestDashboard, Rc<RefCell<Vec<String>>>) {
    let (client, api) = test_api();
    let prompts = Rc::new(RefCell::new(Vec::new()));
    let recorded = Rc::clone(&prompts);
    let confirm: ConfirmFn = Rc::new(move |message: &str| {
        recorded.borrow_mut().push(message.to_string());
        answer
    });
    (client, DashboardController::new(api, confirm), prompts)
}

fn materia(id: &str, nombre: &str) -> Materia {
    Materia::new(id, nombre, 1)
}

fn unidad(id: &str, titulo: &str) -> Unidad {
    Unidad {
        id: Some(id.to_string()),
        id_materia: "m1".to_string(),
        numero: 1,
        titulo: titulo.to_string(),
        descripcion: "desc".to_string(),
        ..Default::default()
    }
}

fn contenido_json(tema_id: &str, nombre: &str) -> Value {
    json!({"tema_id": tema_id, "nombre_tema": nombre, "texto_markdown": "# x", "numero": 1})
}

fn ejercicio_json(id: &str, tema_id: &str) -> Value {
    json!({"id": id, "tema_id": tema_id, "enunciado": "¿?", "tipo": "multiple_choice"})
}

/// 第一个指定方法的请求体
fn body_of(client: &MockHttpClient, method: HttpMethod) -> Value {
    let req = client
        .requests
        .borrow()
        .iter()
        .find(|r| r.method == method)
        .cloned()
        .unwrap();
    serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
}

fn requests_with(client: &MockHttpClient, method: HttpMethod) -> Vec<String> {
    client
        .requests
        .borrow()
        .iter()
        .filter(|r| r.method == method)
        .map(|r| r.url.clone())
        .collect()
}

/// 选中 m1/u1，并准备好两个内容 t1、t2
async fn select_unidad_with_contenidos(client: &MockHttpClient, dash: &TestDashboard) {
    client.mock_response(HttpMethod::Get, &url("materias/m1/unidades"), 200, json!([]));
    client.mock_response(
        HttpMethod::Get,
        &url("admin/contenidos?unidad_id=u1"),
        200,
        json!([contenido_json("t1", "Uno"), contenido_json("t2", "Dos")]),
    );
    client.mock_response(HttpMethod::Get, &url("admin/ejercicios"), 200, json!([]));
    dash.select_materia(materia("m1", "Matemáticas")).await;
    dash.select_unidad(unidad("u1", "Unidad 1")).await;
}

// =========================================================
// 学科加载
// =========================================================

#[tokio::test]
async fn test_load_materias() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(
        HttpMethod::Get,
        &url("materias"),
        200,
        json!([{"id": "m1", "nombre": "Física", "orden": 1}]),
    );

    dash.load_materias().await;

    let state = dash.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.materias, vec![materia("m1", "Física")]);
}

#[tokio::test]
async fn test_load_materias_failure_shows_placeholders() {
    let (_client, dash, _) = create_dashboard(true);

    dash.load_materias().await;

    let names: Vec<String> = dash
        .snapshot()
        .materias
        .into_iter()
        .map(|m| m.nombre)
        .collect();
    assert_eq!(names, vec!["Matemáticas", "Programación", "Base de Datos"]);
}

#[tokio::test]
async fn test_estadisticas_hidden_on_failure() {
    let (client, dash, _) = create_dashboard(true);
    dash.load_estadisticas().await;
    assert_eq!(dash.snapshot().estadisticas, None);

    client.mock_response(
        HttpMethod::Get,
        &url("admin/estadisticas"),
        200,
        json!({"total_materias": 4}),
    );
    dash.load_estadisticas().await;
    assert_eq!(dash.snapshot().estadisticas.unwrap().total_materias, 4);
}

// =========================================================
// 级联选择
// =========================================================

#[tokio::test]
async fn test_select_materia_resets_downstream() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    assert!(!dash.snapshot().contenidos.is_empty());

    client.mock_response(
        HttpMethod::Get,
        &url("materias/m2/unidades"),
        200,
        json!([{"id": "u9", "numero": 1, "titulo": "Nueva", "descripcion": "d"}]),
    );
    dash.select_materia(materia("m2", "Química")).await;

    let state = dash.snapshot();
    assert!(state.is_materia_selected("m2"));
    assert_eq!(state.selected_unidad, None);
    assert!(state.contenidos.is_empty());
    assert!(state.ejercicios.is_empty());
    assert_eq!(state.unidades.len(), 1);
    assert_eq!(state.unidades[0].id(), Some("u9"));
}

#[tokio::test]
async fn test_unidades_failure_leaves_list_empty() {
    let (_client, dash, _) = create_dashboard(true);

    dash.select_materia(materia("m1", "Matemáticas")).await;

    let state = dash.snapshot();
    assert!(state.unidades.is_empty());
    assert!(state.is_materia_selected("m1"));
}

#[tokio::test]
async fn test_ejercicios_filtered_by_loaded_contenidos_in_order() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(
        HttpMethod::Get,
        &url("admin/contenidos?unidad_id=u1"),
        200,
        json!([contenido_json("t1", "Uno"), contenido_json("t2", "Dos")]),
    );
    client.mock_response(
        HttpMethod::Get,
        &url("admin/ejercicios"),
        200,
        json!([
            ejercicio_json("e1", "t2"),
            ejercicio_json("e2", "t3"),
            ejercicio_json("e3", "t1"),
            ejercicio_json("e4", "t2"),
        ]),
    );

    dash.select_unidad(unidad("u1", "Unidad 1")).await;

    let ids: Vec<String> = dash
        .snapshot()
        .ejercicios
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["e1", "e3", "e4"]);
}

#[tokio::test]
async fn test_legacy_unidad_uses_fallback_key() {
    let (client, dash, _) = create_dashboard(true);
    let legacy = Unidad {
        legacy_id: Some("abc".into()),
        numero: 2,
        titulo: "Vieja".into(),
        ..Default::default()
    };

    dash.select_unidad(legacy).await;

    assert!(client.urls().contains(&url("admin/contenidos?unidad_id=abc")));
}

#[tokio::test]
async fn test_unidad_without_any_key_loads_nothing() {
    let (client, dash, _) = create_dashboard(true);

    dash.select_unidad(Unidad::default()).await;

    assert_eq!(client.request_count(), 0);
    assert!(dash.snapshot().selected_unidad.is_some());
}

// =========================================================
// 内容加载失败回退
// =========================================================

#[tokio::test]
async fn test_contenidos_failure_with_zero_count_is_empty() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_raw(HttpMethod::Get, &url("admin/contenidos?unidad_id=u1"), 500, "");
    client.mock_response(
        HttpMethod::Get,
        &url("admin/count/contenidos?unidad_id=u1"),
        200,
        json!({"total_contenidos": 0}),
    );

    dash.select_unidad(unidad("u1", "Unidad 1")).await;

    assert!(dash.snapshot().contenidos.is_empty());
}

#[tokio::test]
async fn test_contenidos_failure_with_nonzero_count_shows_placeholder() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_raw(HttpMethod::Get, &url("admin/contenidos?unidad_id=u1"), 500, "");
    client.mock_response(
        HttpMethod::Get,
        &url("admin/count/contenidos?unidad_id=u1"),
        200,
        json!({"total_contenidos": 2, "unidad_id": "u1"}),
    );

    dash.select_unidad(unidad("u1", "Unidad 1")).await;

    let contenidos = dash.snapshot().contenidos;
    assert_eq!(contenidos.len(), 1);
    assert_eq!(contenidos[0].nombre_tema, "Contenido no disponible");
    assert_eq!(contenidos[0].descripcion.as_deref(), Some(UNAVAILABLE_DESCRIPTION));
    assert_eq!(contenidos[0].id_unidad, "u1");
}

#[tokio::test]
async fn test_contenidos_failure_with_count_failure_is_empty() {
    let (_client, dash, _) = create_dashboard(true);

    dash.select_unidad(unidad("u1", "Unidad 1")).await;

    assert!(dash.snapshot().contenidos.is_empty());
}

#[tokio::test]
async fn test_stale_contenidos_response_is_dropped() {
    let (client, dash, _) = create_dashboard(true);
    let slow = url("admin/contenidos?unidad_id=u1");
    client.mock_response(HttpMethod::Get, &slow, 200, json!([contenido_json("t1", "Viejo")]));
    client.mock_delay(HttpMethod::Get, &slow, Duration::from_millis(50));
    client.mock_response(
        HttpMethod::Get,
        &url("admin/contenidos?unidad_id=u2"),
        200,
        json!([contenido_json("t2", "Nuevo")]),
    );
    client.mock_response(
        HttpMethod::Get,
        &url("admin/ejercicios"),
        200,
        json!([ejercicio_json("e1", "t1"), ejercicio_json("e2", "t2")]),
    );

    let first = dash.select_unidad(unidad("u1", "Unidad 1"));
    let second = async {
        tokio::task::yield_now().await;
        dash.select_unidad(unidad("u2", "Unidad 2")).await;
    };
    tokio::join!(first, second);

    let state = dash.snapshot();
    assert_eq!(state.selected_unidad.unwrap().id(), Some("u2"));
    assert_eq!(state.contenidos.len(), 1);
    assert_eq!(state.contenidos[0].key(), "t2");
    let ids: Vec<String> = state.ejercicios.into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["e2"]);
}

// =========================================================
// 前置条件
// =========================================================

#[test]
fn test_create_unidad_requires_materia() {
    let (client, dash, _) = create_dashboard(true);

    dash.show_create_unidad();

    let state = dash.snapshot();
    assert!(!state.unidad_form.visible);
    let notice = state.notice.unwrap();
    assert!(notice.is_error);
    assert_eq!(notice.message, "Selecciona una materia primero");
    assert_eq!(client.request_count(), 0);
}

#[test]
fn test_create_contenido_requires_unidad() {
    let (_client, dash, _) = create_dashboard(true);

    dash.show_create_contenido();

    let state = dash.snapshot();
    assert!(!state.contenido_form.visible);
    assert_eq!(state.notice.unwrap().message, "Selecciona una unidad primero");
}

#[tokio::test]
async fn test_create_ejercicio_requires_contenidos() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(HttpMethod::Get, &url("admin/contenidos?unidad_id=u1"), 200, json!([]));
    client.mock_response(HttpMethod::Get, &url("admin/ejercicios"), 200, json!([]));
    dash.select_unidad(unidad("u1", "Unidad 1")).await;

    dash.show_create_ejercicio();

    let state = dash.snapshot();
    assert!(!state.ejercicio_form.visible);
    assert_eq!(
        state.notice.unwrap().message,
        "Necesitas tener al menos un contenido en la unidad para crear ejercicios"
    );
}

#[tokio::test]
async fn test_create_forms_default_to_next_number() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(
        HttpMethod::Get,
        &url("materias/m1/unidades"),
        200,
        json!([{"id": "u1", "numero": 1, "titulo": "A", "descripcion": "d"},
               {"id": "u2", "numero": 2, "titulo": "B", "descripcion": "d"}]),
    );
    dash.select_materia(materia("m1", "Matemáticas")).await;

    dash.show_create_unidad();

    let state = dash.snapshot();
    assert!(state.unidad_form.visible);
    assert!(!state.unidad_form.is_editing());
    assert_eq!(state.unidad_form.values.numero, 3);
}

#[tokio::test]
async fn test_create_contenido_prefills_generated_tema_id() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;

    dash.show_create_contenido();

    let values = dash.snapshot().contenido_form.values;
    assert!(values.tema_id.starts_with("tema_"));
    assert!(values.tema_id["tema_".len()..].parse::<i64>().is_ok());
    assert_eq!(values.numero, 3);
}

// =========================================================
// 学科增删改
// =========================================================

#[tokio::test]
async fn test_invalid_materia_form_sends_nothing() {
    let (client, dash, _) = create_dashboard(true);
    dash.show_create_materia();

    dash.save_materia().await;

    let state = dash.snapshot();
    assert!(state.materia_form.visible);
    assert!(state.materia_form.error("nombre").is_some());
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_create_materia() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(HttpMethod::Post, &url("admin/materias"), 201, json!({"ok": true}));
    client.mock_response(
        HttpMethod::Get,
        &url("materias"),
        200,
        json!([{"id": "1", "nombre": "A", "orden": 1}]),
    );
    dash.load_materias().await;
    dash.show_create_materia();
    assert_eq!(dash.snapshot().materia_form.values.orden, 2);
    dash.update_materia_form(|f| f.nombre = "Física".into());

    dash.save_materia().await;

    let body = body_of(&client, HttpMethod::Post);
    assert_eq!(body["nombre"], "Física");
    assert_eq!(body["orden"], 2);
    assert!(body["id"].as_str().unwrap().parse::<i64>().is_ok());

    let state = dash.snapshot();
    assert!(!state.materia_form.visible);
    let notice = state.notice.unwrap();
    assert!(!notice.is_error);
    assert_eq!(notice.message, "Materia creada exitosamente");
    // 创建后重新加载
    assert_eq!(requests_with(&client, HttpMethod::Get).len(), 2);
}

#[tokio::test]
async fn test_update_materia_sends_typed_update() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(HttpMethod::Put, &url("admin/materias/m1"), 200, json!({}));
    client.mock_response(HttpMethod::Get, &url("materias"), 200, json!([]));
    dash.edit_materia(materia("m1", "Física"));
    dash.update_materia_form(|f| f.nombre = "Física II".into());

    dash.save_materia().await;

    assert_eq!(requests_with(&client, HttpMethod::Put), vec![url("admin/materias/m1")]);
    let body = body_of(&client, HttpMethod::Put);
    assert_eq!(body, json!({"nombre": "Física II", "orden": 1}));
    assert_eq!(
        dash.snapshot().notice.unwrap().message,
        "Materia actualizada exitosamente"
    );
}

#[tokio::test]
async fn test_save_failure_keeps_form_open() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_raw(HttpMethod::Post, &url("admin/materias"), 500, "");
    dash.show_create_materia();
    dash.update_materia_form(|f| f.nombre = "Física".into());

    dash.save_materia().await;

    let state = dash.snapshot();
    assert!(state.materia_form.visible);
    let notice = state.notice.unwrap();
    assert!(notice.is_error);
    assert_eq!(notice.message, "Error al crear la materia");
}

#[tokio::test]
async fn test_delete_materia_cancelled() {
    let (client, dash, prompts) = create_dashboard(false);

    dash.delete_materia(materia("m1", "Física")).await;

    assert_eq!(client.request_count(), 0);
    assert_eq!(
        prompts.borrow().as_slice(),
        ["¿Estás seguro de que quieres eliminar la materia \"Física\"?"]
    );
}

#[tokio::test]
async fn test_delete_selected_materia_clears_selection() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_raw(HttpMethod::Delete, &url("admin/materias/m1"), 204, "");
    client.mock_response(HttpMethod::Get, &url("materias"), 200, json!([]));

    dash.delete_materia(materia("m1", "Matemáticas")).await;

    let state = dash.snapshot();
    assert_eq!(state.selected_materia, None);
    assert_eq!(state.selected_unidad, None);
    assert!(state.unidades.is_empty());
    assert!(state.contenidos.is_empty());
    assert_eq!(state.notice.unwrap().message, "Materia eliminada exitosamente");
}

#[tokio::test]
async fn test_delete_other_materia_keeps_selection() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_raw(HttpMethod::Delete, &url("admin/materias/m2"), 204, "");
    client.mock_response(HttpMethod::Get, &url("materias"), 200, json!([]));

    dash.delete_materia(materia("m2", "Historia")).await;

    let state = dash.snapshot();
    assert_eq!(state.selected_materia.unwrap().id, "m1");
    assert_eq!(state.selected_unidad.unwrap().id(), Some("u1"));
    assert_eq!(state.contenidos.len(), 2);
}

// =========================================================
// 单元 / 内容 / 练习增删改
// =========================================================

#[tokio::test]
async fn test_update_unidad_without_id_is_rejected() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(HttpMethod::Get, &url("materias/m1/unidades"), 200, json!([]));
    dash.select_materia(materia("m1", "Matemáticas")).await;
    let before = client.request_count();

    let legacy = Unidad {
        legacy_id: Some("abc".into()),
        numero: 1,
        titulo: "Vieja".into(),
        descripcion: "d".into(),
        ..Default::default()
    };
    dash.edit_unidad(legacy);
    dash.save_unidad().await;

    assert_eq!(client.request_count(), before);
    let notice = dash.snapshot().notice.unwrap();
    assert!(notice.is_error);
    assert!(notice.message.contains("falta identificador"));
}

#[tokio::test]
async fn test_create_unidad_under_selected_materia() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(HttpMethod::Get, &url("materias/m1/unidades"), 200, json!([]));
    client.mock_response(HttpMethod::Post, &url("admin/unidades"), 201, json!({}));
    dash.select_materia(materia("m1", "Matemáticas")).await;
    dash.show_create_unidad();
    dash.update_unidad_form(|f| {
        f.titulo = "Álgebra".into();
        f.descripcion = "Ecuaciones".into();
    });

    dash.save_unidad().await;

    let body = body_of(&client, HttpMethod::Post);
    assert_eq!(body["id_materia"], "m1");
    assert_eq!(body["numero"], 1);
    assert_eq!(dash.snapshot().notice.unwrap().message, "Unidad creada exitosamente");
    // 重新加载单元
    assert_eq!(
        client.last_request().unwrap().url,
        url("materias/m1/unidades")
    );
}

#[tokio::test]
async fn test_create_contenido_links_unidad_and_materia() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_response(HttpMethod::Post, &url("admin/contenido"), 201, json!({}));
    dash.show_create_contenido();
    dash.update_contenido_form(|f| {
        f.nombre_tema = "Fracciones".into();
        f.texto_markdown = "# Fracciones".into();
    });

    dash.save_contenido().await;

    let body = body_of(&client, HttpMethod::Post);
    assert_eq!(body["id_unidad"], "u1");
    assert_eq!(body["id_materia"], "m1");
    assert!(body["tema_id"].as_str().unwrap().starts_with("tema_"));
    assert_eq!(dash.snapshot().notice.unwrap().message, "Contenido creado exitosamente");
}

#[tokio::test]
async fn test_edit_contenido_uses_tema_id() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_response(HttpMethod::Put, &url("admin/contenidos/t2"), 200, json!({}));
    let target = dash.snapshot().contenidos[1].clone();

    dash.edit_contenido(target);
    assert_eq!(dash.snapshot().contenido_form.values.tema_id, "t2");
    dash.save_contenido().await;

    assert_eq!(requests_with(&client, HttpMethod::Put), vec![url("admin/contenidos/t2")]);
}

#[tokio::test]
async fn test_delete_contenido_prompt_and_path() {
    let (client, dash, prompts) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_raw(HttpMethod::Delete, &url("admin/contenido/t1"), 204, "");
    let target = dash.snapshot().contenidos[0].clone();

    dash.delete_contenido(target).await;

    assert_eq!(
        prompts.borrow().last().map(String::as_str),
        Some("¿Estás seguro de que quieres eliminar el contenido \"Uno\"?")
    );
    assert_eq!(requests_with(&client, HttpMethod::Delete), vec![url("admin/contenido/t1")]);
    assert_eq!(
        dash.snapshot().notice.unwrap().message,
        "Contenido eliminado exitosamente"
    );
}

#[tokio::test]
async fn test_new_ejercicio_defaults_to_first_tema() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_response(HttpMethod::Post, &url("admin/ejercicios"), 201, json!({}));
    dash.show_create_ejercicio();
    dash.update_ejercicio_form(|f| {
        f.enunciado = "¿2+2?".into();
        f.respuesta_correcta = "4".into();
        f.opciones = "3, 4, 5".into();
    });

    dash.save_ejercicio().await;

    let body = body_of(&client, HttpMethod::Post);
    assert_eq!(body["tema_id"], "t1");
    assert_eq!(body["tipo"], "multiple_choice");
    assert_eq!(body["dificultad"], "principiante");
    assert_eq!(body["opciones"], json!(["3", "4", "5"]));
    assert_eq!(dash.snapshot().notice.unwrap().message, "Ejercicio creado exitosamente");
}

#[tokio::test]
async fn test_ejercicio_keeps_edited_tema() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_response(HttpMethod::Put, &url("admin/ejercicios/e7"), 200, json!({}));
    let ejercicio: Ejercicio = serde_json::from_value(json!({
        "id": "e7", "tema_id": "t2", "enunciado": "¿?", "respuesta_correcta": "x"
    }))
    .unwrap();

    dash.edit_ejercicio(ejercicio);
    dash.save_ejercicio().await;

    assert_eq!(requests_with(&client, HttpMethod::Put), vec![url("admin/ejercicios/e7")]);
    let body = body_of(&client, HttpMethod::Put);
    assert_eq!(body["enunciado"], "¿?");
    assert_eq!(body["tema_id"], "t2");
}

#[tokio::test]
async fn test_edit_ejercicio_moves_to_other_tema() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_response(HttpMethod::Put, &url("admin/ejercicios/e7"), 200, json!({}));
    let ejercicio: Ejercicio = serde_json::from_value(json!({
        "id": "e7", "tema_id": "t1", "enunciado": "¿?", "respuesta_correcta": "x"
    }))
    .unwrap();

    dash.edit_ejercicio(ejercicio);
    dash.update_ejercicio_form(|f| f.tema_id = "t2".into());
    dash.save_ejercicio().await;

    assert_eq!(body_of(&client, HttpMethod::Put)["tema_id"], "t2");
    assert_eq!(dash.snapshot().notice.unwrap().message, "Ejercicio actualizado exitosamente");
}

#[tokio::test]
async fn test_delete_ejercicio_prompt() {
    let (client, dash, prompts) = create_dashboard(false);

    let ejercicio: Ejercicio =
        serde_json::from_value(ejercicio_json("e1", "t1")).unwrap();
    dash.delete_ejercicio(ejercicio).await;

    assert_eq!(client.request_count(), 0);
    assert_eq!(
        prompts.borrow().as_slice(),
        ["¿Estás seguro de que quieres eliminar este ejercicio?"]
    );
}

// =========================================================
// 通知与详情
// =========================================================

#[test]
fn test_dismiss_only_matching_notice() {
    let (_client, dash, _) = create_dashboard(true);
    dash.show_create_unidad();
    let first = dash.snapshot().notice.unwrap().id;
    dash.show_create_contenido();
    let second = dash.snapshot().notice.unwrap().id;
    assert_ne!(first, second);

    dash.dismiss_notice(first);
    assert_eq!(dash.snapshot().notice.unwrap().id, second);

    dash.dismiss_notice(second);
    assert_eq!(dash.snapshot().notice, None);
}

#[tokio::test]
async fn test_view_contenido_loads_tema_ejercicios() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_response(
        HttpMethod::Get,
        &url("admin/ejercicios/tema/t2"),
        200,
        json!([ejercicio_json("e5", "t2")]),
    );
    let target = dash.snapshot().contenidos[1].clone();

    dash.view_contenido(target).await;

    let detalle = dash.snapshot().detalle.unwrap();
    assert!(!detalle.loading);
    assert_eq!(detalle.contenido.key(), "t2");
    assert_eq!(detalle.ejercicios.len(), 1);

    dash.close_detalle();
    assert_eq!(dash.snapshot().detalle, None);
}

// =========================================================
// 单元删除
// =========================================================

#[tokio::test]
async fn test_delete_selected_unidad_clears_downstream() {
    let (client, dash, prompts) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_response(
        HttpMethod::Get,
        &url("admin/ejercicios"),
        200,
        json!([ejercicio_json("e1", "t1")]),
    );
    dash.load_ejercicios().await;
    assert_eq!(dash.snapshot().ejercicios.len(), 1);
    client.mock_raw(HttpMethod::Delete, &url("admin/unidades/u1"), 204, "");

    dash.delete_unidad(unidad("u1", "Unidad 1")).await;

    assert_eq!(
        prompts.borrow().as_slice(),
        ["¿Estás seguro de que quieres eliminar la unidad \"Unidad 1\"?"]
    );
    let state = dash.snapshot();
    assert_eq!(state.selected_materia.unwrap().id, "m1");
    assert_eq!(state.selected_unidad, None);
    assert!(state.contenidos.is_empty());
    assert!(state.ejercicios.is_empty());
    assert_eq!(state.notice.unwrap().message, "Unidad eliminada exitosamente");
    // 重新加载当前学科的单元
    assert_eq!(client.last_request().unwrap().url, url("materias/m1/unidades"));
}

#[tokio::test]
async fn test_delete_other_unidad_keeps_selection() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_raw(HttpMethod::Delete, &url("admin/unidades/u2"), 204, "");

    dash.delete_unidad(unidad("u2", "Unidad 2")).await;

    let state = dash.snapshot();
    assert_eq!(state.selected_unidad.unwrap().id(), Some("u1"));
    assert_eq!(state.contenidos.len(), 2);
    assert_eq!(requests_with(&client, HttpMethod::Delete), vec![url("admin/unidades/u2")]);
}

#[tokio::test]
async fn test_delete_unidad_without_id_is_rejected() {
    let (client, dash, prompts) = create_dashboard(true);
    let legacy = Unidad {
        legacy_id: Some("abc".into()),
        titulo: "Vieja".into(),
        ..Default::default()
    };

    dash.delete_unidad(legacy).await;

    assert_eq!(prompts.borrow().len(), 1);
    assert_eq!(client.request_count(), 0);
    let notice = dash.snapshot().notice.unwrap();
    assert!(notice.is_error);
    assert_eq!(notice.message, "No se puede eliminar: falta identificador");
}

// =========================================================
// 保存期间切换选择
// =========================================================

#[tokio::test]
async fn test_unidad_saved_after_materia_switch_does_not_reload_old_list() {
    let (client, dash, _) = create_dashboard(true);
    let old_list = url("materias/m1/unidades");
    client.mock_response(
        HttpMethod::Get,
        &old_list,
        200,
        json!([{"id": "u9", "id_materia": "m1", "numero": 1, "titulo": "De M1", "descripcion": "d"}]),
    );
    client.mock_response(
        HttpMethod::Get,
        &url("materias/m2/unidades"),
        200,
        json!([{"id": "u5", "id_materia": "m2", "numero": 1, "titulo": "De M2", "descripcion": "d"}]),
    );
    client.mock_response(HttpMethod::Post, &url("admin/unidades"), 201, json!({}));
    client.mock_delay(HttpMethod::Post, &url("admin/unidades"), Duration::from_millis(50));
    dash.select_materia(materia("m1", "Matemáticas")).await;
    dash.show_create_unidad();
    dash.update_unidad_form(|f| {
        f.titulo = "Nueva".into();
        f.descripcion = "d".into();
    });

    let save = dash.save_unidad();
    let switch = async {
        tokio::task::yield_now().await;
        dash.select_materia(materia("m2", "Programación")).await;
    };
    tokio::join!(save, switch);

    let state = dash.snapshot();
    assert_eq!(state.selected_materia.unwrap().id, "m2");
    assert!(state.unidades.iter().all(|u| u.id_materia == "m2"));
    assert_eq!(state.unidades.len(), 1);
    let old_loads = client.urls().iter().filter(|u| **u == old_list).count();
    assert_eq!(old_loads, 1);
    assert_eq!(state.notice.unwrap().message, "Unidad creada exitosamente");
}

#[tokio::test]
async fn test_contenido_saved_after_unidad_switch_does_not_reload_old_list() {
    let (client, dash, _) = create_dashboard(true);
    select_unidad_with_contenidos(&client, &dash).await;
    client.mock_response(
        HttpMethod::Get,
        &url("admin/contenidos?unidad_id=u2"),
        200,
        json!([contenido_json("t3", "Tres")]),
    );
    client.mock_response(HttpMethod::Post, &url("admin/contenido"), 201, json!({}));
    client.mock_delay(HttpMethod::Post, &url("admin/contenido"), Duration::from_millis(50));
    dash.show_create_contenido();
    dash.update_contenido_form(|f| {
        f.tema_id = "t9".into();
        f.nombre_tema = "Fracciones".into();
        f.texto_markdown = "# Fracciones".into();
    });

    let save = dash.save_contenido();
    let switch = async {
        tokio::task::yield_now().await;
        dash.select_unidad(unidad("u2", "Unidad 2")).await;
    };
    tokio::join!(save, switch);

    let state = dash.snapshot();
    assert_eq!(state.selected_unidad.unwrap().id(), Some("u2"));
    let keys: Vec<&str> = state.contenidos.iter().map(Contenido::key).collect();
    assert_eq!(keys, vec!["t3"]);
    let old_loads = client
        .urls()
        .iter()
        .filter(|u| **u == url("admin/contenidos?unidad_id=u1"))
        .count();
    assert_eq!(old_loads, 1);
}

// =========================================================
// 鉴权失败
// =========================================================

#[tokio::test]
async fn test_unauthorized_load_asks_for_login() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_response(
        HttpMethod::Get,
        &url("materias"),
        401,
        json!({"detail": "Not authenticated"}),
    );

    dash.load_materias().await;

    let state = dash.snapshot();
    assert_eq!(state.materias.len(), 3);
    let notice = state.notice.unwrap();
    assert!(notice.is_error);
    assert_eq!(notice.message, cascade::SESSION_REJECTED);
}

#[tokio::test]
async fn test_other_load_failures_stay_silent() {
    let (client, dash, _) = create_dashboard(true);
    client.mock_raw(HttpMethod::Get, &url("materias"), 500, "boom");

    dash.load_materias().await;

    assert_eq!(dash.snapshot().notice, None);
}
