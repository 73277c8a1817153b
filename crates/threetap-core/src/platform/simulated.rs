//! In-process platform that behaves like a camera stack without touching hardware.
//!
//! Movie outputs write a small placeholder container to the requested path and
//! finalize it on a background thread, so completion arrives off the recorder's
//! worker exactly as it does with a native stack. Every failure mode the recorder
//! handles can be injected through [`SimulationOptions`].

use crate::platform::{
    AudioCategory, AudioMode, AudioSessionBackend, AuthorizationStatus, BackendError,
    CameraPosition, CaptureBackend, CaptureDevice, CaptureGraph, DeviceInput, DeviceKind,
    MediaKind, MovieSink, PermissionBackend, Platform, RouteOptions, SinkEventSender, SinkFailure,
};

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tracing::{debug, warn};

/// Error domain used for failures raised by the simulated movie output.
pub const SIMULATED_ERROR_DOMAIN: &str = "SimulatedCaptureError";

/// Error code reported when the simulated output is told to fail a recording.
pub const SIMULATED_WRITE_FAILURE_CODE: i64 = -11800;

/// Written when a recording starts.
const PLACEHOLDER_HEADER: &[u8] = b"\x00\x00\x00\x14ftypqt  \x00\x00\x00\x00qt  ";

/// Appended when a recording finalizes successfully.
const PLACEHOLDER_MOVIE_BOX: &[u8] = b"\x00\x00\x00\x08moov";

/// Behaviour of a [`SimulatedPlatform`].
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// A rear-facing camera is present.
    pub rear_camera: bool,
    /// A default (position-less) camera is present.
    pub default_camera: bool,
    /// A microphone is present.
    pub microphone: bool,
    /// Opening the camera fails.
    pub reject_camera_input: bool,
    /// The graph refuses the microphone input.
    pub reject_microphone_input: bool,
    /// The graph refuses the movie output.
    pub reject_output: bool,
    /// Category the audio route starts in.
    pub initial_category: AudioCategory,
    /// Changing the audio category fails.
    pub fail_set_category: bool,
    /// Activating the audio route fails.
    pub fail_route_activation: bool,
    /// Answer to the camera prompt.
    pub video_grant: bool,
    /// Answer to the microphone prompt.
    pub audio_grant: bool,
    /// Time the camera prompt takes to resolve.
    pub video_prompt_delay: Duration,
    /// Time the microphone prompt takes to resolve.
    pub audio_prompt_delay: Duration,
    /// Time after the graph starts running before the video connection is
    /// active. `None` means it never activates.
    pub connection_activation_delay: Option<Duration>,
    /// Time a stopped recording takes to finalize.
    pub finalize_delay: Duration,
    /// Finalize stopped recordings on a background thread. When `false`,
    /// they wait for [`SimulatedPlatform::finish_pending`].
    pub auto_finalize: bool,
    /// Fail the next recordings with this description, leaving a zero-byte file.
    pub write_failure: Option<String>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            rear_camera: true,
            default_camera: true,
            microphone: true,
            reject_camera_input: false,
            reject_microphone_input: false,
            reject_output: false,
            initial_category: AudioCategory::SoloAmbient,
            fail_set_category: false,
            fail_route_activation: false,
            video_grant: true,
            audio_grant: true,
            video_prompt_delay: Duration::from_millis(5),
            audio_prompt_delay: Duration::from_millis(5),
            connection_activation_delay: Some(Duration::from_millis(100)),
            finalize_delay: Duration::from_millis(20),
            auto_finalize: true,
            write_failure: None,
        }
    }
}

struct PendingFinish {
    path: PathBuf,
    events: SinkEventSender,
    recording: Arc<AtomicBool>,
    failure: Option<SinkFailure>,
}

struct SimState {
    options: Mutex<SimulationOptions>,
    category: Mutex<AudioCategory>,
    route_active: AtomicBool,
    video_status: Mutex<AuthorizationStatus>,
    audio_status: Mutex<AuthorizationStatus>,
    running_since: Mutex<Option<Instant>>,
    pending: Mutex<Vec<PendingFinish>>,
    graphs_built: AtomicUsize,
    runs_started: AtomicUsize,
    recordings_started: AtomicUsize,
    category_changes: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| {
        warn!("Simulated platform lock poisoned, recovering");
        e.into_inner()
    })
}

/// Software camera, microphone, audio route and permission prompts.
#[derive(Clone)]
pub struct SimulatedPlatform {
    state: Arc<SimState>,
}

impl SimulatedPlatform {
    /// Create a simulated platform with the given behaviour.
    pub fn new(options: SimulationOptions) -> Self {
        let category = options.initial_category;
        Self {
            state: Arc::new(SimState {
                options: Mutex::new(options),
                category: Mutex::new(category),
                route_active: AtomicBool::new(false),
                video_status: Mutex::new(AuthorizationStatus::NotDetermined),
                audio_status: Mutex::new(AuthorizationStatus::NotDetermined),
                running_since: Mutex::new(None),
                pending: Mutex::new(Vec::new()),
                graphs_built: AtomicUsize::new(0),
                runs_started: AtomicUsize::new(0),
                recordings_started: AtomicUsize::new(0),
                category_changes: AtomicUsize::new(0),
            }),
        }
    }

    /// Bundle this simulation as a [`Platform`].
    pub fn platform(&self) -> Platform {
        Platform {
            capture: Arc::new(self.clone()),
            audio_session: Arc::new(self.clone()),
            permissions: Arc::new(self.clone()),
        }
    }

    /// Change behaviour while running.
    pub fn update_options(&self, update: impl FnOnce(&mut SimulationOptions)) {
        update(&mut lock(&self.state.options));
    }

    /// Number of capture graphs created.
    pub fn graphs_built(&self) -> usize {
        self.state.graphs_built.load(Ordering::SeqCst)
    }

    /// Number of times a graph went from stopped to running.
    pub fn runs_started(&self) -> usize {
        self.state.runs_started.load(Ordering::SeqCst)
    }

    /// Number of files a movie output started writing.
    pub fn recordings_started(&self) -> usize {
        self.state.recordings_started.load(Ordering::SeqCst)
    }

    /// Number of audio category switches.
    pub fn category_changes(&self) -> usize {
        self.state.category_changes.load(Ordering::SeqCst)
    }

    /// Current audio route category.
    pub fn current_category(&self) -> AudioCategory {
        *lock(&self.state.category)
    }

    /// Whether the audio route has been activated.
    pub fn route_active(&self) -> bool {
        self.state.route_active.load(Ordering::SeqCst)
    }

    /// Reset the audio route behind the recorder's back, as the OS does when
    /// another app takes over audio.
    pub fn reset_audio_route(&self, category: AudioCategory) {
        *lock(&self.state.category) = category;
        self.state.route_active.store(false, Ordering::SeqCst);
    }

    /// Pre-set grant state, as if the user answered in an earlier session.
    pub fn set_authorization(&self, kind: MediaKind, status: AuthorizationStatus) {
        match kind {
            MediaKind::Video => *lock(&self.state.video_status) = status,
            MediaKind::Audio => *lock(&self.state.audio_status) = status,
        }
    }

    /// Finalize every stopped recording held back by `auto_finalize = false`.
    ///
    /// Returns the number of recordings finalized.
    pub fn finish_pending(&self) -> usize {
        let pending: Vec<PendingFinish> = lock(&self.state.pending).drain(..).collect();
        let count = pending.len();
        for finish in pending {
            finalize(finish);
        }
        count
    }

    fn options(&self) -> SimulationOptions {
        lock(&self.state.options).clone()
    }

    fn device(id: &str, name: &str, kind: DeviceKind) -> CaptureDevice {
        CaptureDevice {
            id: id.to_string(),
            name: name.to_string(),
            kind,
        }
    }
}

fn finalize(finish: PendingFinish) {
    let PendingFinish {
        path,
        events,
        recording,
        mut failure,
    } = finish;

    if failure.is_none() {
        let appended = OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut file| file.write_all(PLACEHOLDER_MOVIE_BOX));
        if let Err(e) = appended {
            failure = Some(io_failure(&e));
        }
    }

    recording.store(false, Ordering::SeqCst);
    debug!(path = ?path, failed = failure.is_some(), "Simulated recording finalized");
    events.finished(&path, failure);
}

fn io_failure(error: &std::io::Error) -> SinkFailure {
    SinkFailure {
        domain: SIMULATED_ERROR_DOMAIN.to_string(),
        code: error.raw_os_error().map_or(-1, i64::from),
        description: error.to_string(),
    }
}

impl CaptureBackend for SimulatedPlatform {
    fn camera(&self, position: CameraPosition) -> Option<CaptureDevice> {
        let options = self.options();
        match position {
            CameraPosition::Back if options.rear_camera => Some(Self::device(
                "sim-back-camera",
                "Simulated Back Camera",
                DeviceKind::Camera(CameraPosition::Back),
            )),
            _ => None,
        }
    }

    fn default_camera(&self) -> Option<CaptureDevice> {
        if !self.options().default_camera {
            return None;
        }
        Some(Self::device(
            "sim-default-camera",
            "Simulated Camera",
            DeviceKind::Camera(CameraPosition::Unspecified),
        ))
    }

    fn default_microphone(&self) -> Option<CaptureDevice> {
        if !self.options().microphone {
            return None;
        }
        Some(Self::device(
            "sim-microphone",
            "Simulated Microphone",
            DeviceKind::Microphone,
        ))
    }

    fn open_input(&self, device: &CaptureDevice) -> Result<DeviceInput, BackendError> {
        if matches!(device.kind, DeviceKind::Camera(_)) && self.options().reject_camera_input {
            return Err(BackendError(format!("{} is in use", device.name)));
        }
        Ok(DeviceInput {
            device: device.clone(),
        })
    }

    fn new_graph(&self) -> Box<dyn CaptureGraph> {
        self.state.graphs_built.fetch_add(1, Ordering::SeqCst);
        Box::new(SimulatedGraph {
            platform: self.clone(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            running: false,
        })
    }

    fn new_movie_sink(&self) -> Arc<dyn MovieSink> {
        Arc::new(SimulatedSink {
            platform: self.clone(),
            recording: Arc::new(AtomicBool::new(false)),
            active: Mutex::new(None),
        })
    }
}

struct SimulatedGraph {
    platform: SimulatedPlatform,
    inputs: Vec<DeviceInput>,
    outputs: Vec<Arc<dyn MovieSink>>,
    running: bool,
}

impl CaptureGraph for SimulatedGraph {
    fn begin_configuration(&mut self) {}

    fn commit_configuration(&mut self) {
        debug!(
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            "Simulated graph configuration committed"
        );
    }

    fn can_add_input(&self, input: &DeviceInput) -> bool {
        if input.device.kind == DeviceKind::Microphone
            && self.platform.options().reject_microphone_input
        {
            return false;
        }
        !self.inputs.iter().any(|i| i.device.id == input.device.id)
    }

    fn add_input(&mut self, input: DeviceInput) {
        self.inputs.push(input);
    }

    fn can_add_output(&self, _sink: &dyn MovieSink) -> bool {
        !self.platform.options().reject_output && self.outputs.is_empty()
    }

    fn add_output(&mut self, sink: Arc<dyn MovieSink>) {
        self.outputs.push(sink);
    }

    fn remove_all(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
    }

    fn start_running(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        *lock(&self.platform.state.running_since) = Some(Instant::now());
        self.platform.state.runs_started.fetch_add(1, Ordering::SeqCst);
    }

    fn stop_running(&mut self) {
        self.running = false;
        *lock(&self.platform.state.running_since) = None;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

struct ActiveWrite {
    path: PathBuf,
    events: SinkEventSender,
    failure: Option<SinkFailure>,
}

struct SimulatedSink {
    platform: SimulatedPlatform,
    recording: Arc<AtomicBool>,
    active: Mutex<Option<ActiveWrite>>,
}

impl MovieSink for SimulatedSink {
    fn start_recording(&self, path: &Path, events: SinkEventSender) {
        if self.recording.swap(true, Ordering::SeqCst) {
            warn!(path = ?path, "Simulated output already recording, ignoring");
            return;
        }

        let options = self.platform.options();
        let failure = options.write_failure.map(|description| SinkFailure {
            domain: SIMULATED_ERROR_DOMAIN.to_string(),
            code: SIMULATED_WRITE_FAILURE_CODE,
            description,
        });
        let header: &[u8] = if failure.is_some() {
            &[]
        } else {
            PLACEHOLDER_HEADER
        };

        if let Err(e) = fs::write(path, header) {
            self.recording.store(false, Ordering::SeqCst);
            events.finished(path, Some(io_failure(&e)));
            return;
        }

        self.platform
            .state
            .recordings_started
            .fetch_add(1, Ordering::SeqCst);
        events.started(path);
        *lock(&self.active) = Some(ActiveWrite {
            path: path.to_path_buf(),
            events,
            failure,
        });
    }

    fn stop_recording(&self) {
        let Some(active) = lock(&self.active).take() else {
            return;
        };

        let finish = PendingFinish {
            path: active.path,
            events: active.events,
            recording: Arc::clone(&self.recording),
            failure: active.failure,
        };

        let options = self.platform.options();
        if options.auto_finalize {
            let delay = options.finalize_delay;
            std::thread::spawn(move || {
                std::thread::sleep(delay);
                finalize(finish);
            });
        } else {
            lock(&self.platform.state.pending).push(finish);
        }
    }

    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    fn is_connection_active(&self) -> bool {
        let delay = self.platform.options().connection_activation_delay;
        match (*lock(&self.platform.state.running_since), delay) {
            (Some(since), Some(delay)) => since.elapsed() >= delay,
            _ => false,
        }
    }
}

impl AudioSessionBackend for SimulatedPlatform {
    fn category(&self) -> AudioCategory {
        *lock(&self.state.category)
    }

    fn set_category(
        &self,
        category: AudioCategory,
        mode: AudioMode,
        options: RouteOptions,
    ) -> Result<(), BackendError> {
        if self.options().fail_set_category {
            return Err(BackendError("audio category change refused".to_string()));
        }
        *lock(&self.state.category) = category;
        self.state.category_changes.fetch_add(1, Ordering::SeqCst);
        debug!(?category, ?mode, ?options, "Simulated audio category set");
        Ok(())
    }

    fn set_active(&self, active: bool) -> Result<(), BackendError> {
        if active && self.options().fail_route_activation {
            return Err(BackendError("audio route activation refused".to_string()));
        }
        self.state.route_active.store(active, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl PermissionBackend for SimulatedPlatform {
    fn authorization_status(&self, kind: MediaKind) -> AuthorizationStatus {
        match kind {
            MediaKind::Video => *lock(&self.state.video_status),
            MediaKind::Audio => *lock(&self.state.audio_status),
        }
    }

    async fn request_access(&self, kind: MediaKind) -> bool {
        let status = self.authorization_status(kind);
        if status != AuthorizationStatus::NotDetermined {
            return status == AuthorizationStatus::Authorized;
        }

        let options = self.options();
        let (delay, granted) = match kind {
            MediaKind::Video => (options.video_prompt_delay, options.video_grant),
            MediaKind::Audio => (options.audio_prompt_delay, options.audio_grant),
        };
        tokio::time::sleep(delay).await;

        let answer = if granted {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        self.set_authorization(kind, answer);

        granted
    }
}
