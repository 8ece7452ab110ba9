use crate::domain::artifacts::RenderInput;
use crate::domain::clock::format_civil_date;
use crate::domain::contracts::ServiceWindow;

/// Form fields the contract template may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractField {
    Number,
    Make,
    Color,
    Plate,
    Model,
    Driver,
    NationalId,
    ServiceDay,
    ServiceByHour,
    StartTime,
    EndTime,
    CityDate,
    Lessee,
    LandlordName,
    LandlordId,
}

impl ContractField {
    pub const ALL: [ContractField; 15] = [
        ContractField::Number,
        ContractField::Make,
        ContractField::Color,
        ContractField::Plate,
        ContractField::Model,
        ContractField::Driver,
        ContractField::NationalId,
        ContractField::ServiceDay,
        ContractField::ServiceByHour,
        ContractField::StartTime,
        ContractField::EndTime,
        ContractField::CityDate,
        ContractField::Lessee,
        ContractField::LandlordName,
        ContractField::LandlordId,
    ];

    /// Name of the field in the template.
    pub fn key(&self) -> &'static str {
        match self {
            ContractField::Number => "numero",
            ContractField::Make => "marca",
            ContractField::Color => "color",
            ContractField::Plate => "placa",
            ContractField::Model => "modelo",
            ContractField::Driver => "conductor",
            ContractField::NationalId => "cedula",
            ContractField::ServiceDay => "servicio_dia",
            ContractField::ServiceByHour => "servicio_hora",
            ContractField::StartTime => "hora_inicio",
            ContractField::EndTime => "hora_fin",
            ContractField::CityDate => "ciudad_fecha",
            ContractField::Lessee => "arrendatario",
            ContractField::LandlordName => "nombre_arrendador",
            ContractField::LandlordId => "documento_arrendador",
        }
    }

    /// A template without these cannot produce a usable contract.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            ContractField::Number | ContractField::Plate | ContractField::Driver
        )
    }
}

/// Field of the template that marks where the signature goes.
pub const SIGNATURE_FIELD: &str = "firma";

/// Values to write, in [`ContractField::ALL`] order; blank values are omitted.
pub fn field_values(input: &RenderInput) -> Vec<(ContractField, String)> {
    let contract = &input.contract;
    let profile = &input.driver.profile;
    let vehicle = &profile.vehicle;

    let (service_day, by_hour, start, end) = match &contract.service {
        ServiceWindow::ByDay { date } => (Some(format_civil_date(*date)), None, None, None),
        ServiceWindow::ByHour { start, end } => (
            None,
            Some("X".to_string()),
            Some(start.clone()),
            Some(end.clone()),
        ),
    };

    let value = |field: ContractField| -> Option<String> {
        match field {
            ContractField::Number => Some(contract.contract_number.clone()),
            ContractField::Make => vehicle.make.clone(),
            ContractField::Color => vehicle.color.clone(),
            ContractField::Plate => vehicle.plate.clone(),
            ContractField::Model => vehicle.model.clone(),
            ContractField::Driver => Some(profile.full_name.clone()),
            ContractField::NationalId => profile.national_id.clone(),
            ContractField::ServiceDay => service_day.clone(),
            ContractField::ServiceByHour => by_hour.clone(),
            ContractField::StartTime => start.clone(),
            ContractField::EndTime => end.clone(),
            ContractField::CityDate => Some(format!(
                "{}, {}",
                contract.city.trim(),
                format_civil_date(input.today)
            )),
            ContractField::Lessee => Some(input.lessee.clone()),
            ContractField::LandlordName => contract.landlord_name.clone(),
            ContractField::LandlordId => contract.landlord_id.clone(),
        }
    };

    ContractField::ALL
        .into_iter()
        .filter_map(|field| {
            value(field)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (field, v))
        })
        .collect()
}
