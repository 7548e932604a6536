/// Supervisor state. Transitions are pure; the supervisor applies them
/// under its lock and performs the side effects itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ServerState {
    /// Nothing running or starting
    #[default]
    Idle,
    /// A start attempt is in flight
    Starting { generation: u64, target: String },
    /// Slidev reported its URL and the attempt was not superseded
    Running {
        generation: u64,
        target: String,
        url: String,
    },
}

/// What a start request for some target should do given the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPlan {
    /// Already serving this target
    Reuse(String),
    /// Wait on the in-flight attempt for this target
    Join,
    /// Busy with another target; stop it, then decide again
    Restart,
    /// Nothing to reuse; spawn a new process
    Launch,
}

impl ServerState {
    pub fn starting(generation: u64, target: impl Into<String>) -> Self {
        Self::Starting {
            generation,
            target: target.into(),
        }
    }

    pub fn plan_start(&self, target: &str) -> StartPlan {
        match self {
            Self::Idle => StartPlan::Launch,
            Self::Running {
                target: current,
                url,
                ..
            } if current == target => StartPlan::Reuse(url.clone()),
            Self::Starting {
                target: current, ..
            } if current == target => StartPlan::Join,
            Self::Running { .. } | Self::Starting { .. } => StartPlan::Restart,
        }
    }

    /// `Starting` -> `Running` if `generation` is still the live attempt.
    pub fn commit(&self, generation: u64, url: &str) -> Option<Self> {
        match self {
            Self::Starting {
                generation: current,
                target,
            } if *current == generation => Some(Self::Running {
                generation,
                target: target.clone(),
                url: url.to_string(),
            }),
            _ => None,
        }
    }

    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Starting { generation, .. } | Self::Running { generation, .. } => {
                Some(*generation)
            }
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Starting { target, .. } | Self::Running { target, .. } => Some(target),
        }
    }

    /// Committed URL; only a running state has one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Running { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn is_starting(&self) -> bool {
        matches!(self, Self::Starting { .. })
    }
}
