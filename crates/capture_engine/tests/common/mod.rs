#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use capture_core::RequestId;
use capture_engine::{
    Camera, CameraConstraints, CameraError, CameraStream, Capabilities, FilePicker, FrameSize,
    Geolocator, LocationError, Position, SubmissionError, SubmissionRequest,
    SubmissionTransport, VideoSink, Workflow, WorkflowSettings,
};
use image::{ImageFormat, Rgb, RgbImage};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(capture_logging::initialize_for_tests);
}

/// Counters shared between a fake camera and its streams.
#[derive(Debug, Default)]
pub struct CameraProbe {
    pub requests: AtomicUsize,
    pub live: AtomicUsize,
    pub max_live: AtomicUsize,
    pub stops: AtomicUsize,
    pub constraints: Mutex<Vec<CameraConstraints>>,
}

impl CameraProbe {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub enum CameraMode {
    Grant { reported: Option<FrameSize> },
    Deny(CameraError),
}

/// Camera that grants or denies on command. Each stream paints a different
/// solid colour so successive captures are distinguishable.
pub struct FakeCamera {
    mode: CameraMode,
    delay: Duration,
    pub probe: Arc<CameraProbe>,
}

impl FakeCamera {
    pub fn granting(reported: Option<FrameSize>) -> Self {
        Self {
            mode: CameraMode::Grant { reported },
            delay: Duration::ZERO,
            probe: Arc::new(CameraProbe::default()),
        }
    }

    pub fn denying(error: CameraError) -> Self {
        Self {
            mode: CameraMode::Deny(error),
            delay: Duration::ZERO,
            probe: Arc::new(CameraProbe::default()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl Camera for FakeCamera {
    async fn request(
        &self,
        constraints: CameraConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        let generation = self.probe.requests.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.constraints.lock().unwrap().push(constraints);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.mode {
            CameraMode::Deny(error) => Err(error.clone()),
            CameraMode::Grant { reported } => {
                let live = self.probe.live.fetch_add(1, Ordering::SeqCst) + 1;
                self.probe.max_live.fetch_max(live, Ordering::SeqCst);
                Ok(Box::new(FakeStream {
                    color: Rgb([(generation * 60 % 256) as u8, 20, 200]),
                    reported: *reported,
                    probe: Arc::clone(&self.probe),
                    stopped: false,
                }))
            }
        }
    }
}

struct FakeStream {
    color: Rgb<u8>,
    reported: Option<FrameSize>,
    probe: Arc<CameraProbe>,
    stopped: bool,
}

impl CameraStream for FakeStream {
    fn video_size(&self) -> Option<FrameSize> {
        self.reported
    }

    fn grab_frame(&mut self, size: FrameSize) -> Result<RgbImage, CameraError> {
        if self.stopped {
            return Err(CameraError::Device("stream stopped".to_string()));
        }
        Ok(RgbImage::from_pixel(size.width, size.height, self.color))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.probe.live.fetch_sub(1, Ordering::SeqCst);
            self.probe.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub struct FakeGeolocator {
    result: Result<Position, LocationError>,
    delay: Duration,
}

impl FakeGeolocator {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            result: Ok(Position {
                latitude,
                longitude,
            }),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(error: LocationError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl Geolocator for FakeGeolocator {
    async fn current_position(&self) -> Result<Position, LocationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result
    }
}

pub struct FakePicker(pub Option<Vec<u8>>);

#[async_trait::async_trait]
impl FilePicker for FakePicker {
    async fn pick(&self) -> Option<Vec<u8>> {
        self.0.clone()
    }
}

/// Transport that replays scripted outcomes (success once the script is
/// exhausted) after a fixed delay and records every request.
pub struct FakeTransport {
    delay: Duration,
    outcomes: Mutex<VecDeque<Result<(), SubmissionError>>>,
    pub requests: Mutex<Vec<SubmissionRequest>>,
}

impl FakeTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then(self, outcome: Result<(), SubmissionError>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SubmissionTransport for FakeTransport {
    async fn submit(&self, request: SubmissionRequest) -> Result<(), SubmissionError> {
        self.requests.lock().unwrap().push(request);
        tokio::time::sleep(self.delay).await;
        self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<String>>,
}

impl VideoSink for RecordingSink {
    fn attach(&self, request: RequestId, _size: Option<FrameSize>) {
        self.events.lock().unwrap().push(format!("attach {request}"));
    }

    fn detach(&self, request: RequestId) {
        self.events.lock().unwrap().push(format!("detach {request}"));
    }
}

/// Handles to every fake wired into a workflow.
pub struct Harness {
    pub camera: Arc<CameraProbe>,
    pub transport: Arc<FakeTransport>,
    pub sink: Arc<RecordingSink>,
    pub navigations: Arc<AtomicUsize>,
}

impl Harness {
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

pub struct Setup {
    pub camera: FakeCamera,
    pub geolocation: Option<FakeGeolocator>,
    pub picker: FakePicker,
    pub transport: FakeTransport,
    pub settings: WorkflowSettings,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            camera: FakeCamera::granting(Some(FrameSize::new(1280, 720))),
            geolocation: Some(FakeGeolocator::at(19.0760, 72.8777)),
            picker: FakePicker(None),
            transport: FakeTransport::new(Duration::from_secs(2)),
            settings: WorkflowSettings::default(),
        }
    }
}

impl Setup {
    pub fn build(self) -> (Workflow, Harness) {
        let probe = Arc::clone(&self.camera.probe);
        let transport = Arc::new(self.transport);
        let sink = Arc::new(RecordingSink::default());
        let navigations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&navigations);
        let caps = Capabilities {
            camera: Arc::new(self.camera),
            geolocation: self
                .geolocation
                .map(|g| Arc::new(g) as Arc<dyn Geolocator>),
            picker: Arc::new(self.picker),
            transport: transport.clone(),
            navigator: Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            viewfinder: sink.clone(),
        };
        let workflow = Workflow::new(caps, self.settings);
        (
            workflow,
            Harness {
                camera: probe,
                transport,
                sink,
                navigations,
            },
        )
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, Rgb([120, 80, 40]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
