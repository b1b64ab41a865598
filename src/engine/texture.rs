use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlImageElement, WebGlRenderingContext, WebGlTexture};

/// A GPU texture whose image arrives asynchronously.
///
/// Until the image's `onload` fires, the texture holds a single placeholder
/// pixel and `is_loaded` reports false so callers can draw a fallback instead.
pub struct Texture {
    pub texture: WebGlTexture,
    loaded: Rc<Cell<bool>>,
}

impl Texture {
    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Start loading `url` into a fresh texture. Returns immediately.
    pub fn load(gl: &WebGlRenderingContext, url: &str) -> Result<Self, JsValue> {
        let texture = gl.create_texture().ok_or("Failed to create texture")?;
        gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture));

        let pixel = [0u8, 0, 0, 255];
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            WebGlRenderingContext::TEXTURE_2D,
            0,
            WebGlRenderingContext::RGBA as i32,
            1,
            1,
            0,
            WebGlRenderingContext::RGBA,
            WebGlRenderingContext::UNSIGNED_BYTE,
            Some(&pixel),
        )?;

        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));

        let loaded = Rc::new(Cell::new(false));

        let onload = {
            let gl = gl.clone();
            let texture = texture.clone();
            let img = img.clone();
            let loaded = loaded.clone();
            let url = url.to_string();
            Closure::wrap(Box::new(move || {
                gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture));
                if let Err(e) = gl.tex_image_2d_with_u32_and_u32_and_image(
                    WebGlRenderingContext::TEXTURE_2D,
                    0,
                    WebGlRenderingContext::RGBA as i32,
                    WebGlRenderingContext::RGBA,
                    WebGlRenderingContext::UNSIGNED_BYTE,
                    &img,
                ) {
                    log::warn!("texture {url}: upload failed: {e:?}");
                    return;
                }

                if is_power_of_2(img.width()) && is_power_of_2(img.height()) {
                    gl.generate_mipmap(WebGlRenderingContext::TEXTURE_2D);
                } else {
                    gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_S, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
                    gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_WRAP_T, WebGlRenderingContext::CLAMP_TO_EDGE as i32);
                    gl.tex_parameteri(WebGlRenderingContext::TEXTURE_2D, WebGlRenderingContext::TEXTURE_MIN_FILTER, WebGlRenderingContext::LINEAR as i32);
                }
                loaded.set(true);
                log::debug!("texture {url}: loaded {}x{}", img.width(), img.height());
            }) as Box<dyn FnMut()>)
        };

        let onerror = {
            let url = url.to_string();
            Closure::wrap(Box::new(move || {
                log::warn!("texture {url}: failed to load, using fallback color");
            }) as Box<dyn FnMut()>)
        };

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();

        img.set_src(url);

        Ok(Texture { texture, loaded })
    }
}

fn is_power_of_2(value: u32) -> bool {
    value != 0 && (value & (value - 1)) == 0
}
