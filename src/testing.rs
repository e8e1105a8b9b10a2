//! Object kinds shared by the unit tests.

use crate::reflect::{
    DynamicObject, ObjectBase, PropertyDescriptor, PropertyValue, Reflect, INSTANCE_NAME_KEY,
};
use crate::value::Value;
use chrono::NaiveDate;

/// A person with a closed set of declared properties.
#[derive(Debug, Default)]
pub struct Person {
    base: ObjectBase,
    pub age: i64,
    pub height_in_cm: i64,
    pub date_of_birth: Option<NaiveDate>,
}

impl Person {
    pub fn new(name: &str) -> Self {
        Person {
            base: ObjectBase::named(name),
            ..Person::default()
        }
    }

    pub fn adopt(&mut self, child: impl Reflect) {
        self.base.adopt(Box::new(child));
    }
}

impl Reflect for Person {
    fn type_tag(&self) -> &str {
        "Person"
    }

    fn object(&self) -> &ObjectBase {
        &self.base
    }

    fn object_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn properties(&self) -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::read_write(INSTANCE_NAME_KEY),
            PropertyDescriptor::read_only("readOnlyName"),
            PropertyDescriptor::read_write("age"),
            PropertyDescriptor::read_write("heightInCm"),
            PropertyDescriptor::read_write("dateOfBirth"),
        ]
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        let value = match name {
            INSTANCE_NAME_KEY | "readOnlyName" => Value::from(self.base.name()),
            "age" => Value::Int(self.age),
            "heightInCm" => Value::Int(self.height_in_cm),
            "dateOfBirth" => self.date_of_birth.map(Value::Date).unwrap_or_default(),
            _ => return None,
        };
        Some(value.into())
    }

    fn set_property(&mut self, name: &str, value: &Value) -> bool {
        match name {
            INSTANCE_NAME_KEY => self.base.write(name, value),
            "age" => value.to_int().map(|v| self.age = v).is_some(),
            "heightInCm" => value.to_int().map(|v| self.height_in_cm = v).is_some(),
            "dateOfBirth" => value
                .to_date()
                .map(|d| self.date_of_birth = Some(d))
                .is_some(),
            _ => false,
        }
    }
}

/// A pet with one declared property and an open set of dynamic ones.
#[derive(Debug, Default)]
pub struct Pet {
    base: ObjectBase,
    pub species: String,
}

impl Pet {
    pub fn new(name: &str, species: &str) -> Self {
        Pet {
            base: ObjectBase::named(name),
            species: species.to_string(),
        }
    }

    pub fn dynamic(&self, name: &str) -> Option<&Value> {
        self.base.dynamic_property(name)
    }
}

impl Reflect for Pet {
    fn type_tag(&self) -> &str {
        "Pet"
    }

    fn object(&self) -> &ObjectBase {
        &self.base
    }

    fn object_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn properties(&self) -> Vec<PropertyDescriptor> {
        let mut props = vec![PropertyDescriptor::read_write("species")];
        props.extend(self.base.dynamic_descriptors());
        props
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        match name {
            "species" => Some(Value::from(self.species.as_str()).into()),
            _ => self.base.dynamic_property(name).cloned().map(Into::into),
        }
    }

    fn set_property(&mut self, name: &str, value: &Value) -> bool {
        match name {
            "species" => value.to_text().map(|s| self.species = s).is_some(),
            _ => self.base.write(name, value),
        }
    }
}

/// A kind whose properties refer to objects it owns outside its children.
#[derive(Debug, Default)]
pub struct Garage {
    base: ObjectBase,
    pub car: Pet,
    pub spares: Vec<Pet>,
}

impl Reflect for Garage {
    fn type_tag(&self) -> &str {
        "Garage"
    }

    fn object(&self) -> &ObjectBase {
        &self.base
    }

    fn object_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn properties(&self) -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::read_only("car"),
            PropertyDescriptor::read_only("spares"),
        ]
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        match name {
            "car" => Some(PropertyValue::Object(&self.car)),
            "spares" => Some(PropertyValue::Objects(
                self.spares.iter().map(|p| p as &dyn Reflect).collect(),
            )),
            _ => None,
        }
    }

    fn set_property(&mut self, _name: &str, _value: &Value) -> bool {
        false
    }
}

/// An account whose password can be written but never read back.
#[derive(Debug, Default)]
pub struct Account {
    base: ObjectBase,
    pub login: String,
    pub password: String,
    pub balance: f64,
}

impl Reflect for Account {
    fn type_tag(&self) -> &str {
        "Account"
    }

    fn object(&self) -> &ObjectBase {
        &self.base
    }

    fn object_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn properties(&self) -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::read_write("login"),
            PropertyDescriptor::write_only("password"),
            PropertyDescriptor::read_write("balance"),
        ]
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        let value = match name {
            "login" => Value::from(self.login.as_str()),
            "password" => Value::from(self.password.as_str()),
            "balance" => Value::Float(self.balance),
            _ => return None,
        };
        Some(value.into())
    }

    fn set_property(&mut self, name: &str, value: &Value) -> bool {
        match name {
            "login" => value.to_text().map(|s| self.login = s).is_some(),
            "password" => value.to_text().map(|s| self.password = s).is_some(),
            "balance" => value.to_float().map(|f| self.balance = f).is_some(),
            _ => false,
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Jane with children John and Josephine; Josephine owns the dog Spot.
pub fn family() -> Person {
    let mut jane = Person::new("Jane");
    jane.height_in_cm = 170;
    jane.date_of_birth = Some(date(1969, 7, 20));

    let mut john = Person::new("John");
    john.height_in_cm = 190;
    john.date_of_birth = Some(date(1995, 5, 20));

    let mut josephine = Person::new("Josephine");
    josephine.height_in_cm = 50;
    josephine.date_of_birth = Some(date(2000, 12, 25));

    let mut spot = Pet::new("Spot", "dog");
    spot.object_mut().set_dynamic_property("vaccinated", true);
    josephine.adopt(spot);

    jane.adopt(john);
    jane.adopt(josephine);
    jane
}

/// `len` untagged base objects, each the only child of the one before.
/// The innermost carries the property `level`.
pub fn chain(len: usize) -> DynamicObject {
    let mut node = DynamicObject::new().with_property("level", len as i64);
    for _ in 1..len {
        node = DynamicObject::new().with_child(node);
    }
    node
}

pub fn child<T: 'static>(node: &dyn Reflect, index: usize) -> &T {
    node.children()[index].downcast_ref::<T>().unwrap()
}
