use {
    crate::{Json, JsonDeExt, JsonSerExt, StdResult},
    serde::{de::DeserializeOwned, Deserialize, Serialize},
};

/// An event emitted by the module, consisting of a type name and an arbitrary
/// JSON payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContractEvent {
    #[serde(rename = "type")]
    pub ty: String,
    pub data: Json,
}

impl ContractEvent {
    pub fn new<T>(ty: &str, data: &T) -> StdResult<Self>
    where
        T: Serialize,
    {
        Ok(Self {
            ty: ty.to_string(),
            data: data.to_json_value()?,
        })
    }

    /// Attempt to decode the payload, given the event type matches.
    pub fn decode<T>(&self, ty: &str) -> Option<StdResult<T>>
    where
        T: DeserializeOwned,
    {
        (self.ty == ty).then(|| self.data.clone().deserialize_json())
    }
}

/// Implement `TryInto<ContractEvent>` for both `T` and `&T`, such that when
/// calling `Response::add_event`, the caller may pass either by reference or
/// by value.
#[macro_export]
macro_rules! contract_event {
    ($ty:ty => $name:literal) => {
        impl $ty {
            pub const EVENT_NAME: &'static str = $name;
        }

        impl TryFrom<&$ty> for $crate::ContractEvent {
            type Error = $crate::StdError;

            fn try_from(value: &$ty) -> Result<Self, Self::Error> {
                $crate::ContractEvent::new($name, value)
            }
        }

        impl TryFrom<$ty> for $crate::ContractEvent {
            type Error = $crate::StdError;

            fn try_from(value: $ty) -> Result<Self, Self::Error> {
                $crate::ContractEvent::new($name, &value)
            }
        }
    };
}

/// A helper that provides better looking syntax for building a list of events.
#[derive(Default, Debug)]
pub struct EventBuilder {
    events: Vec<ContractEvent>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    pub fn push<T>(&mut self, event: T) -> Result<&mut Self, T::Error>
    where
        T: TryInto<ContractEvent>,
    {
        self.events.push(event.try_into()?);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl IntoIterator for EventBuilder {
    type IntoIter = std::vec::IntoIter<ContractEvent>;
    type Item = ContractEvent;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

/// The outcome of an execute or end-block call: the events it emitted.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub events: Vec<ContractEvent>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event<T>(mut self, event: T) -> Result<Self, T::Error>
    where
        T: TryInto<ContractEvent>,
    {
        self.events.push(event.try_into()?);
        Ok(self)
    }

    pub fn add_events<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = ContractEvent>,
    {
        self.events.extend(events);
        self
    }

    pub fn merge(mut self, other: Response) -> Self {
        self.events.extend(other.events);
        self
    }

    /// Find and decode all events of the given type.
    pub fn events_of<T>(&self, ty: &str) -> StdResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.events.iter().filter_map(|event| event.decode(ty)).collect()
    }
}

// ----------------------------------- tests -----------------------------------
