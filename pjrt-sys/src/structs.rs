// Constructors for the `PJRT_*_Args` structs actually used by `pjrt`.
//
// Every PJRT args struct begins with a `struct_size` field that callers must
// set to the struct's compile-time size (the ABI's versioning mechanism) and
// an `extension_start` field that callers leave null unless attaching an
// extension. `impl_new!` generates a `::new()` that zeroes the struct
// (`Default`, from bindgen's `derive_default(true)`) and fills in
// `struct_size`.
macro_rules! impl_new {
    ($t:ident, $s:ident) => {
        impl $crate::$t {
            pub const STRUCT_SIZE: usize = $crate::$s as usize;

            pub fn new() -> Self {
                let mut t = $crate::$t::default();
                t.struct_size = Self::STRUCT_SIZE;
                t
            }
        }
    };
    ($t:ident) => {
        impl $crate::$t {
            pub fn new() -> Self {
                $crate::$t::default()
            }
        }
    };
}

impl_new!(PJRT_Error_Destroy_Args, PJRT_Error_Destroy_Args_STRUCT_SIZE);

impl_new!(PJRT_Error_Message_Args, PJRT_Error_Message_Args_STRUCT_SIZE);

impl_new!(PJRT_Error_GetCode_Args, PJRT_Error_GetCode_Args_STRUCT_SIZE);

impl_new!(
    PJRT_Plugin_Initialize_Args,
    PJRT_Plugin_Initialize_Args_STRUCT_SIZE
);

impl_new!(PJRT_Event_Destroy_Args, PJRT_Event_Destroy_Args_STRUCT_SIZE);

impl_new!(PJRT_Event_Await_Args, PJRT_Event_Await_Args_STRUCT_SIZE);

impl_new!(PJRT_Event_Error_Args, PJRT_Event_Error_Args_STRUCT_SIZE);

impl_new!(PJRT_Event_OnReady_Args, PJRT_Event_OnReady_Args_STRUCT_SIZE);

impl_new!(PJRT_Client_Create_Args, PJRT_Client_Create_Args_STRUCT_SIZE);

impl_new!(
    PJRT_Client_Destroy_Args,
    PJRT_Client_Destroy_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Client_PlatformName_Args,
    PJRT_Client_PlatformName_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Client_Devices_Args,
    PJRT_Client_Devices_Args_STRUCT_SIZE
);

impl_new!(PJRT_Program, PJRT_Program_STRUCT_SIZE);

impl_new!(
    PJRT_Client_Compile_Args,
    PJRT_Client_Compile_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Client_BufferFromHostBuffer_Args,
    PJRT_Client_BufferFromHostBuffer_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Device_GetDescription_Args,
    PJRT_Device_GetDescription_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_DeviceDescription_ToString_Args,
    PJRT_DeviceDescription_ToString_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Buffer_Destroy_Args,
    PJRT_Buffer_Destroy_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Buffer_ToHostBuffer_Args,
    PJRT_Buffer_ToHostBuffer_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Buffer_ElementType_Args,
    PJRT_Buffer_ElementType_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Buffer_Dimensions_Args,
    PJRT_Buffer_Dimensions_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Executable_Destroy_Args,
    PJRT_Executable_Destroy_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Executable_NumOutputs_Args,
    PJRT_Executable_NumOutputs_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_Executable_OutputDimensions_Args,
    PJRT_Executable_OutputDimensions_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_LoadedExecutable_Destroy_Args,
    PJRT_LoadedExecutable_Destroy_Args_STRUCT_SIZE
);

impl_new!(
    PJRT_LoadedExecutable_GetExecutable_Args,
    PJRT_LoadedExecutable_GetExecutable_Args_STRUCT_SIZE
);

impl_new!(PJRT_ExecuteOptions, PJRT_ExecuteOptions_STRUCT_SIZE);

impl_new!(
    PJRT_LoadedExecutable_Execute_Args,
    PJRT_LoadedExecutable_Execute_Args_STRUCT_SIZE
);
