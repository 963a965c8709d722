use serde::{Deserialize, Serialize};

use crate::catalog::{
    ComponentProbability, DeflagrationModel, FailureMode, FuelType, NozzleModel,
    OverpressureProbitModel, ThermalProbitModel,
};
use crate::occupants::OccupantDistributionInfoCollection;
use crate::quantity::ConvertibleValue;

/// 저장소에 들어갈 수 있는 값의 전체 목록.
///
/// 새 값 종류를 추가하면 초기화(`reset_databases`)와 백엔드 입력 수집의 match가
/// 컴파일 오류를 내므로 처리 방식을 함께 정해야 한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum StateValue {
    Quantity(ConvertibleValue),
    Flag(bool),
    Integer(i64),
    Text(String),
    Nozzle(NozzleModel),
    Fuel(FuelType),
    ThermalProbit(ThermalProbitModel),
    OverpressureProbit(OverpressureProbitModel),
    Deflagration(DeflagrationModel),
    ComponentProbabilities(Vec<ComponentProbability>),
    FailureMode(FailureMode),
    Occupants(OccupantDistributionInfoCollection),
}

impl StateValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            StateValue::Quantity(_) => <ConvertibleValue as FromStateValue>::TYPE_NAME,
            StateValue::Flag(_) => <bool as FromStateValue>::TYPE_NAME,
            StateValue::Integer(_) => <i64 as FromStateValue>::TYPE_NAME,
            StateValue::Text(_) => <String as FromStateValue>::TYPE_NAME,
            StateValue::Nozzle(_) => <NozzleModel as FromStateValue>::TYPE_NAME,
            StateValue::Fuel(_) => <FuelType as FromStateValue>::TYPE_NAME,
            StateValue::ThermalProbit(_) => <ThermalProbitModel as FromStateValue>::TYPE_NAME,
            StateValue::OverpressureProbit(_) => {
                <OverpressureProbitModel as FromStateValue>::TYPE_NAME
            }
            StateValue::Deflagration(_) => <DeflagrationModel as FromStateValue>::TYPE_NAME,
            StateValue::ComponentProbabilities(_) => {
                <Vec<ComponentProbability> as FromStateValue>::TYPE_NAME
            }
            StateValue::FailureMode(_) => <FailureMode as FromStateValue>::TYPE_NAME,
            StateValue::Occupants(_) => {
                <OccupantDistributionInfoCollection as FromStateValue>::TYPE_NAME
            }
        }
    }

    /// 같은 종류의 값인지 (내용은 비교하지 않는다).
    pub fn same_shape(&self, other: &StateValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn as_quantity(&self) -> Option<&ConvertibleValue> {
        match self {
            StateValue::Quantity(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_quantity_mut(&mut self) -> Option<&mut ConvertibleValue> {
        match self {
            StateValue::Quantity(v) => Some(v),
            _ => None,
        }
    }
}

/// `get::<T>`가 꺼낼 수 있는 타입.
pub trait FromStateValue: Sized {
    const TYPE_NAME: &'static str;

    fn from_state_value(value: &StateValue) -> Option<Self>;
}

macro_rules! state_value_conversions {
    ($($variant:ident => $ty:ty, $name:literal;)*) => {
        $(
            impl FromStateValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_state_value(value: &StateValue) -> Option<Self> {
                    match value {
                        StateValue::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for StateValue {
                fn from(value: $ty) -> Self {
                    StateValue::$variant(value)
                }
            }
        )*
    };
}

state_value_conversions! {
    Quantity => ConvertibleValue, "ConvertibleValue";
    Flag => bool, "bool";
    Integer => i64, "i64";
    Text => String, "String";
    Nozzle => NozzleModel, "NozzleModel";
    Fuel => FuelType, "FuelType";
    ThermalProbit => ThermalProbitModel, "ThermalProbitModel";
    OverpressureProbit => OverpressureProbitModel, "OverpressureProbitModel";
    Deflagration => DeflagrationModel, "DeflagrationModel";
    ComponentProbabilities => Vec<ComponentProbability>, "ComponentProbability[]";
    FailureMode => FailureMode, "FailureMode";
    Occupants => OccupantDistributionInfoCollection, "OccupantDistributionInfoCollection";
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}
