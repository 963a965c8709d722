//! 상태 저장소의 파라미터 키.
//!
//! UI 패널과 해석 백엔드가 공유하는 계약 표면이므로 이름을 바꾸려면 로드 시
//! 마이그레이션을 함께 추가해야 한다. 저장소는 키를 대문자로 바꿔 비교한다.

// 배관 및 운전 조건
pub const PIPE_OUTER_DIAMETER: &str = "SysParam.PipeOD";
pub const PIPE_WALL_THICKNESS: &str = "SysParam.PipeWallThick";
pub const PIPE_LENGTH: &str = "SysParam.PipeLength";
pub const INTERNAL_PRESSURE: &str = "SysParam.InternalPresMPA";
pub const EXTERNAL_PRESSURE: &str = "SysParam.ExternalPresMPA";
pub const SYSTEM_TEMPERATURE: &str = "SysParam.SysTempC";
pub const AMBIENT_TEMPERATURE: &str = "SysParam.ExternalTempC";
pub const LEAK_DISCHARGE_COEFFICIENT: &str = "Leak.DischargeCoefficient";
pub const RELEASE_ANGLE: &str = "ReleaseAngle";

// 밀폐 공간과 환기구
pub const ENCLOSURE_HEIGHT: &str = "Enclosure.Height";
pub const ENCLOSURE_FLOOR_AREA: &str = "Enclosure.AreaOfFloorAndCeiling";
pub const ENCLOSURE_RELEASE_HEIGHT: &str = "Enclosure.HeightOfRelease";
pub const ENCLOSURE_WALL_DISTANCE: &str = "Enclosure.XWallDist";
pub const ENCLOSURE_VOLUME: &str = "Enclosure.Volume";
pub const VENT_CEILING_AREA: &str = "Vent.CeilingArea";
pub const VENT_CEILING_HEIGHT: &str = "Vent.CeilingHeight";
pub const VENT_FLOOR_AREA: &str = "Vent.FloorArea";
pub const VENT_FLOOR_HEIGHT: &str = "Vent.FloorHeight";
pub const VENT_VOLUME_FLOW_RATE: &str = "Vent.VolumeFlowRate";

// 시설 및 주변 환경
pub const FACILITY_LENGTH: &str = "Facility.Length";
pub const FACILITY_WIDTH: &str = "Facility.Width";
pub const FACILITY_HEIGHT: &str = "Facility.Height";
pub const AMBIENT_DENSITY: &str = "Ambient.Density";
pub const WIND_SPEED: &str = "Ambient.WindSpeed";
pub const RELATIVE_HUMIDITY: &str = "Flame.RelativeHumidity";

// 점화 및 검지
pub const IGNITION_THRESHOLDS: &str = "Ignition.ThresholdsKgPerSec";
pub const IMMEDIATE_IGNITION_PROBS: &str = "Ignition.ImmediateProbabilities";
pub const DELAYED_IGNITION_PROBS: &str = "Ignition.DelayedProbabilities";
pub const DETECTION_PROBABILITY: &str = "Leak.DetectionProbability";

// 결과 모델
pub const THERMAL_EXPOSURE_TIME: &str = "Consequence.ThermalExposureTime";
pub const TNT_EQUIVALENCE_FACTOR: &str = "Overpressure.TntEquivalenceFactor";
pub const BST_MACH_FLAME_SPEED: &str = "Overpressure.BstMachFlameSpeed";
pub const NOZZLE_MODEL: &str = "NozzleModel";
pub const FUEL_TYPE: &str = "FuelType";
pub const THERMAL_PROBIT_MODEL: &str = "ThermalProbitModel";
pub const OVERPRESSURE_PROBIT_MODEL: &str = "OverpressureProbitModel";
pub const DEFLAGRATION_MODEL: &str = "DeflagrationModel";

// 그래프
pub const PLOT_PRESSURE_TIMES: &str = "OpWrapper.PlotDotsPressureAtTimes";
pub const PLOT_PRESSURE_MARKS: &str = "OpWrapper.PlotMarksPressure";
pub const MAX_SIMULATION_TIME: &str = "OpWrapper.MaxSimTime";
pub const PLUME_CONTOUR_MOLE_FRACTIONS: &str = "Plume.ContourMoleFractions";
pub const PLUME_X_LIMITS: &str = "Plume.XLimits";
pub const PLUME_Y_LIMITS: &str = "Plume.YLimits";
pub const RADIATIVE_FLUX_CONTOURS: &str = "Flame.ContourLevelsKwPerM2";
pub const PLOT_AUTO_LIMITS: &str = "Plot.AutoSetLimits";

// QRA 시나리오
pub const RANDOM_SEED: &str = "RandomSeed";
pub const VEHICLE_COUNT: &str = "nVehicles";
pub const FUELINGS_PER_VEHICLE_DAY: &str = "nFuelingsPerVehicleDay";
pub const VEHICLE_OPERATING_DAYS: &str = "nVehicleOperatingDays";
pub const ANALYSIS_NOTES: &str = "Analysis.Notes";
pub const OCCUPANT_DISTRIBUTIONS: &str = "OccupantDistributions";

/// 누출 크기별 확률표. 부품별로 하나씩 있다.
pub const COMPONENT_PROBABILITY_KEYS: &[&str] = &[
    "Prob.Compressor",
    "Prob.Cylinder",
    "Prob.Filter",
    "Prob.Flange",
    "Prob.Hose",
    "Prob.Joint",
    "Prob.Pipe",
    "Prob.Valve",
    "Prob.Instrument",
];

/// 부품 고장 모드. 키 하나에 고장 모드 하나.
pub const FAILURE_MODE_KEYS: &[&str] = &[
    "Failure.Nozzle.PopOff",
    "Failure.Nozzle.FailToClose",
    "Failure.ManualValve.FailToClose",
    "Failure.SolenoidValve.FailToClose",
    "Failure.SolenoidValve.CommonCause",
    "Failure.Dispenser.Overpressure",
    "Failure.Breakaway.FailToClose",
    "Failure.Driveoff.Accident",
];

// 구버전 작업자 분포 키. 로드 시 OccupantDistributions로 옮긴다.
pub const LEGACY_WORKER_DISTRIBUTION: &str = "WorkerDistribution";
pub const LEGACY_WORKER_COUNT: &str = "nWorkers";
pub const LEGACY_YEARLY_WORKING_HOURS: &str = "YearlyWorkingHours";
pub const LEGACY_MIN_DISTANCE: &str = "MinDist";
pub const LEGACY_MAX_DISTANCE: &str = "MaxDist";
pub const LEGACY_WORKER_DIST_MEAN: &str = "WorkerDistMean";
pub const LEGACY_WORKER_DIST_STD_DEV: &str = "WorkerDistStdDev";

/// 이 중 하나라도 있으면 구버전 작업자 분포 파일로 본다.
pub const LEGACY_WORKER_KEYS: &[&str] = &[
    LEGACY_WORKER_COUNT,
    LEGACY_YEARLY_WORKING_HOURS,
    LEGACY_MIN_DISTANCE,
    LEGACY_MAX_DISTANCE,
    LEGACY_WORKER_DIST_MEAN,
    LEGACY_WORKER_DIST_STD_DEV,
];
