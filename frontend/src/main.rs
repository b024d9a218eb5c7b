use eduweb_frontend::App;
use leptos::prelude::*;

// WASM 目标下使用 lol_alloc 作为全局分配器
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    // panic 信息输出到浏览器控制台
    console_error_panic_hook::set_once();
    leptos::logging::log!("[App] EduWeb admin 启动");
    mount_to_body(App);
}
