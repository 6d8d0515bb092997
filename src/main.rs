use heedless::App;
use heedless::config::APP_ROOT_ID;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    heedless::utils::log::init();

    let root = document()
        .get_element_by_id(APP_ROOT_ID)
        .expect("page must contain the #app element")
        .unchecked_into::<web_sys::HtmlElement>();

    mount_to(root, App).forget();
}
