//! Webcam acquisition through getUserMedia
//!
//! The stream is attached to a `<video>` element owned by the page; the host
//! runs the landmark model on that element and feeds the results back.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use super::camera_slot::MediaSource;

const IDEAL_WIDTH: u32 = 640;
const IDEAL_HEIGHT: u32 = 480;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("No window found")]
    NoWindow,
    #[error("No video element with id '{0}' found")]
    NoVideoElement(String),
    #[error("Media devices are not available")]
    NoMediaDevices,
    #[error("Camera access denied or not available: {0}")]
    AccessDenied(String),
    #[error("getUserMedia did not return a MediaStream")]
    NotAStream,
    #[error("Video playback failed: {0}")]
    Playback(String),
}

impl From<CameraError> for JsValue {
    fn from(err: CameraError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub struct Camera {
    video: HtmlVideoElement,
    stream: MediaStream,
}

impl Camera {
    /// Request a video-only stream and start playing it in `video_id`
    pub async fn start(video_id: &str) -> Result<Self, CameraError> {
        let window = web_sys::window().ok_or(CameraError::NoWindow)?;
        let video = window
            .document()
            .and_then(|doc| doc.get_element_by_id(video_id))
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
            .ok_or_else(|| CameraError::NoVideoElement(video_id.to_string()))?;

        let devices = window
            .navigator()
            .media_devices()
            .map_err(|_| CameraError::NoMediaDevices)?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video_constraints());
        constraints.set_audio(&JsValue::FALSE);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| CameraError::AccessDenied(format!("{:?}", e)))?;
        let stream = JsFuture::from(promise)
            .await
            .map_err(|e| CameraError::AccessDenied(format!("{:?}", e)))?
            .dyn_into::<MediaStream>()
            .map_err(|_| CameraError::NotAStream)?;

        video.set_src_object(Some(&stream));
        let camera = Self { video, stream };

        // play() resolves once metadata is in, so the frame size is known after it
        let played = match camera.video.play() {
            Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = played {
            camera.stop();
            return Err(CameraError::Playback(format!("{:?}", e)));
        }

        Ok(camera)
    }

    /// Native resolution of the stream, falling back to the requested one
    pub fn frame_size(&self) -> (f32, f32) {
        let (w, h) = (self.video.video_width(), self.video.video_height());
        if w == 0 || h == 0 {
            (IDEAL_WIDTH as f32, IDEAL_HEIGHT as f32)
        } else {
            (w as f32, h as f32)
        }
    }

    /// Release the hardware and detach the stream from the element
    pub fn stop(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
    }
}

impl MediaSource for Camera {
    fn stop(&self) {
        Camera::stop(self);
    }
}

fn video_constraints() -> JsValue {
    let ideal = |value: u32| {
        let obj = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&obj, &"ideal".into(), &JsValue::from(value));
        obj
    };

    let video = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&video, &"width".into(), &ideal(IDEAL_WIDTH));
    let _ = js_sys::Reflect::set(&video, &"height".into(), &ideal(IDEAL_HEIGHT));
    let _ = js_sys::Reflect::set(&video, &"facingMode".into(), &"user".into());
    video.into()
}
